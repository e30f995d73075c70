//! Deterministic seed directions for field-line starting points.

use glam::Vec3;
use std::f32::consts::PI;

/// Produces `count` unit directions evenly distributed on the sphere via the
/// Fibonacci/golden-angle construction.
///
/// Each direction is a pure function of its index, so the sequence is lazy,
/// restartable, and identical on every call:
/// `φᵢ = acos(1 − 2(i + 0.5)/count)`, `θᵢ = π(1 + √5)·i`.
pub fn seed_directions(count: usize) -> impl Iterator<Item = Vec3> + Clone {
    (0..count).map(move |i| {
        let phi = (1.0 - 2.0 * (i as f32 + 0.5) / count as f32).acos();
        let theta = PI * (1.0 + 5.0_f32.sqrt()) * i as f32;
        Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_for_equal_counts() {
        let a: Vec<Vec3> = seed_directions(32).collect();
        let b: Vec<Vec3> = seed_directions(32).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn all_directions_are_unit_length() {
        for count in [1, 2, 7, 64, 257] {
            for (i, dir) in seed_directions(count).enumerate() {
                assert!(
                    (dir.length() - 1.0).abs() < 1e-4,
                    "direction {i} of {count} is not unit length: {dir:?}"
                );
            }
        }
    }

    #[test]
    fn zero_count_is_empty() {
        assert_eq!(seed_directions(0).count(), 0);
    }

    #[test]
    fn directions_spread_over_both_hemispheres() {
        let dirs: Vec<Vec3> = seed_directions(16).collect();
        assert!(dirs.iter().any(|d| d.z > 0.5));
        assert!(dirs.iter().any(|d| d.z < -0.5));
    }
}
