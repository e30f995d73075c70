use glam::Vec3;
use rand::Rng;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy)]
pub struct PointCharge {
    pub pos: Vec3,
    pub charge: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// Render-facing snapshot of a single charge.
#[derive(Debug, Clone, Copy)]
pub struct ChargeMarker {
    pub pos: Vec3,
    pub charge: f32,
    pub polarity: Polarity,
}

#[derive(Debug)]
pub struct ChargeSet {
    pub points: Vec<PointCharge>,
}

impl PointCharge {
    pub fn polarity(&self) -> Polarity {
        if self.charge > 0.0 {
            Polarity::Positive
        } else if self.charge < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

impl ChargeSet {
    pub fn from_parts(parts: Vec<(Vec3, f32)>) -> Self {
        let points = parts
            .into_iter()
            .map(|(pos, charge)| PointCharge { pos, charge })
            .collect();

        Self { points }
    }

    /// A positive/negative pair on the x axis, `separation` apart.
    pub fn dipole(separation: f32, magnitude: f32) -> Self {
        let half = separation * 0.5;
        Self::from_parts(vec![
            (Vec3::new(-half, 0.0, 0.0), magnitude),
            (Vec3::new(half, 0.0, 0.0), -magnitude),
        ])
    }

    /// Four alternating charges on the corners of a square in the xz plane.
    pub fn quadrupole(separation: f32, magnitude: f32) -> Self {
        let half = separation * 0.5;
        Self::from_parts(vec![
            (Vec3::new(-half, 0.0, -half), magnitude),
            (Vec3::new(half, 0.0, -half), -magnitude),
            (Vec3::new(half, 0.0, half), magnitude),
            (Vec3::new(-half, 0.0, half), -magnitude),
        ])
    }

    pub fn random_in_cube(
        count: usize,
        half_range: f32,
        magnitude_range: RangeInclusive<f32>,
        rng: &mut impl Rng,
    ) -> Self {
        let parts = (0..count)
            .map(|_| {
                let pos = Vec3::new(
                    rng.random_range(-half_range..=half_range),
                    rng.random_range(-half_range..=half_range),
                    rng.random_range(-half_range..=half_range),
                );
                let magnitude = rng.random_range(magnitude_range.clone());
                let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                (pos, magnitude * sign)
            })
            .collect();

        Self::from_parts(parts)
    }

    pub fn markers(&self) -> Vec<ChargeMarker> {
        self.points
            .iter()
            .map(|c| ChargeMarker {
                pos: c.pos,
                charge: c.charge,
                polarity: c.polarity(),
            })
            .collect()
    }

    /// Padded min/max corners of all charge positions, for debug overlays.
    ///
    /// Returns `None` when the set is empty.
    pub fn bounding_box(&self, padding: f32) -> Option<(Vec3, Vec3)> {
        let first = self.points.first()?;
        let mut min = first.pos;
        let mut max = first.pos;
        for c in &self.points[1..] {
            min = min.min(c.pos);
            max = max.max(c.pos);
        }
        Some((min - Vec3::splat(padding), max + Vec3::splat(padding)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_follows_charge_sign() {
        let make = |charge| PointCharge {
            pos: Vec3::ZERO,
            charge,
        };
        assert_eq!(make(2.5).polarity(), Polarity::Positive);
        assert_eq!(make(-0.1).polarity(), Polarity::Negative);
        assert_eq!(make(0.0).polarity(), Polarity::Neutral);
    }

    #[test]
    fn bounding_box_pads_extremes() {
        let set = ChargeSet::from_parts(vec![
            (Vec3::new(-1.0, 0.0, 2.0), 1.0),
            (Vec3::new(3.0, -2.0, 0.0), -1.0),
        ]);

        let (min, max) = set.bounding_box(0.5).unwrap();
        assert_eq!(min, Vec3::new(-1.5, -2.5, -0.5));
        assert_eq!(max, Vec3::new(3.5, 0.5, 2.5));
    }

    #[test]
    fn bounding_box_of_empty_set_is_none() {
        let set = ChargeSet::from_parts(Vec::new());
        assert!(set.bounding_box(1.0).is_none());
    }
}
