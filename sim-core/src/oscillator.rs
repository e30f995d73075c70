//! Noise-driven modulation of charge magnitudes over time.

use crate::charge::ChargeSet;
use noise::{NoiseFn, Perlin};
use rand::Rng;

/// Per-charge oscillation data captured once at initialization.
///
/// Stores the baseline magnitude of every charge plus a noise seed drawn
/// uniformly from `[0, 1000)`. Both are immutable afterward and read every
/// tick by [`update`].
pub struct OscillationState {
    baseline: Vec<f32>,
    seed: Vec<f64>,
    noise: Perlin,
}

impl OscillationState {
    /// Captures the current charge values as baselines and draws one noise
    /// seed per charge from the injected generator.
    pub fn capture(charges: &ChargeSet, rng: &mut impl Rng) -> Self {
        let baseline = charges.points.iter().map(|c| c.charge).collect();
        let seed = charges
            .points
            .iter()
            .map(|_| rng.random_range(0.0..1000.0))
            .collect();

        Self {
            baseline,
            seed,
            noise: Perlin::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.baseline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty()
    }
}

/// Sets every charge's magnitude from a smooth noise sample.
///
/// For each charge with a nonzero baseline `b`, the magnitude oscillates
/// between `max(0.1, 0.05·|b|)` and `|b|`: Perlin noise is sampled at
/// `(seed, time·speed)`, remapped from `[-1, 1]` to a `[0, 1]` blend factor,
/// and used to interpolate between the two bounds. The baseline's sign is
/// reapplied, so a charge never flips polarity. Charges whose baseline is
/// exactly zero are left untouched.
///
/// The sample is deterministic given `(seed, t)` and continuous in `t`.
pub fn update(charges: &mut ChargeSet, state: &OscillationState, time: f32, speed: f32) {
    let t = (time * speed) as f64;

    let per_charge = state.baseline.iter().zip(&state.seed);
    for (c, (&baseline, &seed)) in charges.points.iter_mut().zip(per_charge) {
        if baseline == 0.0 {
            continue;
        }

        let magnitude = baseline.abs();
        let min_mag = (magnitude * 0.05).max(0.1);

        let sample = state.noise.get([seed, t]) as f32;
        let blend = (sample * 0.5 + 0.5).clamp(0.0, 1.0);

        c.charge = (min_mag + (magnitude - min_mag) * blend) * baseline.signum();
    }
}
