//! RK4 integration of charge positions along a rotation about an axis.

use crate::charge::ChargeSet;
use glam::Vec3;

/// Tangential velocity of a point circling `axis` through `pivot`.
///
/// The tangent is normalized, so the linear speed equals the angular speed
/// regardless of the distance from the axis. Points on the axis itself (where
/// the cross product vanishes) get a zero velocity instead of a NaN.
fn velocity_at(pos: Vec3, axis: Vec3, angular_speed_rad: f32, pivot: Vec3) -> Vec3 {
    axis.cross(pos - pivot).normalize_or_zero() * angular_speed_rad
}

/// Advances every charge one RK4 step through the rotational velocity field.
///
/// Each charge is integrated independently:
/// `pos += dt/6 · (k1 + 2·k2 + 2·k3 + k4)` with the four slopes sampled at
/// the current position and the usual midpoint/endpoint estimates.
///
/// ### Parameters
/// - `charges` - Set whose positions are updated in place.
/// - `dt` - Integration time step in seconds.
/// - `axis` - Rotation axis; normalized here, a zero axis means no motion.
/// - `angular_speed_deg` - Angular speed in degrees per second.
/// - `pivot` - Point the rotation axis passes through.
pub fn advance(
    charges: &mut ChargeSet,
    dt: f32,
    axis: Vec3,
    angular_speed_deg: f32,
    pivot: Vec3,
) {
    let axis = axis.normalize_or_zero();
    let speed = angular_speed_deg.to_radians();

    for c in &mut charges.points {
        let v = |p: Vec3| velocity_at(p, axis, speed, pivot);

        let k1 = v(c.pos);
        let k2 = v(c.pos + 0.5 * dt * k1);
        let k3 = v(c.pos + 0.5 * dt * k2);
        let k4 = v(c.pos + dt * k3);

        c.pos += (dt / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_angular_speed_leaves_positions_unchanged() {
        let mut charges = ChargeSet::from_parts(vec![
            (Vec3::new(1.0, 2.0, 3.0), 1.0),
            (Vec3::new(-4.0, 0.5, 0.0), -2.0),
        ]);
        let before: Vec<Vec3> = charges.points.iter().map(|c| c.pos).collect();

        advance(&mut charges, 123.0, Vec3::Y, 0.0, Vec3::ZERO);

        for (c, b) in charges.points.iter().zip(&before) {
            assert_eq!(c.pos, *b);
        }
    }

    #[test]
    fn rotation_stays_on_circle_for_unit_radius() {
        // At radius 1 the normalized tangential speed coincides with rigid
        // rotation, so a charge should circle the pivot without drifting.
        let mut charges = ChargeSet::from_parts(vec![(Vec3::new(1.0, 0.0, 0.0), 1.0)]);

        for _ in 0..100 {
            advance(&mut charges, 0.05, Vec3::Y, 90.0, Vec3::ZERO);
        }

        let p = charges.points[0].pos;
        assert!((p.length() - 1.0).abs() < 1e-3, "radius drifted: {:?}", p);
        assert!(p.y.abs() < 1e-6, "motion left the rotation plane: {:?}", p);
        assert!(
            (p - Vec3::new(1.0, 0.0, 0.0)).length() > 0.1,
            "charge did not move"
        );
    }

    #[test]
    fn degenerate_axis_and_pivot_produce_no_nan() {
        let pivot = Vec3::new(2.0, -1.0, 0.0);
        let mut charges = ChargeSet::from_parts(vec![
            (pivot, 1.0),                     // exactly on the pivot
            (Vec3::new(5.0, 3.0, 1.0), -1.0), // ordinary position, zero axis
        ]);

        advance(&mut charges, 0.1, Vec3::ZERO, 45.0, pivot);

        assert_eq!(charges.points[0].pos, pivot);
        assert!(charges.points[1].pos.is_finite());
        assert_eq!(charges.points[1].pos, Vec3::new(5.0, 3.0, 1.0));
    }
}
