//! High-level simulation phases for the charge–field system.
//!
//! The typical update loop looks like:
//! 1. [`motion_phase`] — charges advance along their rotation about the
//!    configured axis (RK4).
//! 2. [`oscillation_phase`] — charge magnitudes are modulated by smooth
//!    noise around their captured baselines.
//! 3. [`trace_phase`] — every positive charge fans out seed directions and
//!    a field line is integrated for each, against the freshly updated set.
//!
//! Field lines are rebuilt from scratch on every pass; the previous batch is
//! simply dropped by the caller. All phases are safe no-ops on an empty set.

use crate::{
    charge::ChargeSet,
    config::Config,
    motion,
    oscillator::{self, OscillationState},
    seeding,
    trace::{self, FieldLine},
};

/// Advances charge positions along the configured rotation.
///
/// Delegates to [`motion::advance`] with the axis, angular speed, and pivot
/// from `cfg`. A zero angular speed skips the integration entirely, which
/// also guarantees bit-identical positions across the tick.
pub fn motion_phase(charges: &mut ChargeSet, cfg: &Config, dt: f32) {
    if cfg.angular_speed_deg == 0.0 {
        return;
    }
    motion::advance(
        charges,
        dt,
        cfg.rotation_axis,
        cfg.angular_speed_deg,
        cfg.pivot,
    );
}

/// Modulates charge magnitudes when oscillation is enabled in `cfg`.
pub fn oscillation_phase(
    charges: &mut ChargeSet,
    state: &OscillationState,
    time: f32,
    cfg: &Config,
) {
    if !cfg.oscillation_enabled {
        return;
    }
    oscillator::update(charges, state, time, cfg.oscillation_speed);
}

/// Regenerates the full set of field lines for the current charge state.
///
/// For each charge with a strictly positive sign, `cfg.lines_per_charge`
/// seed directions are drawn from the Fibonacci sphere and one line is
/// traced per direction with [`trace::trace_line`]. Negative charges are
/// never seeded — they participate only as sinks and field sources.
/// Degenerate traces (fewer than two points) produce no output.
///
/// ### Returns
/// The freshly traced lines, in per-charge, per-seed order.
pub fn trace_phase(charges: &ChargeSet, cfg: &Config) -> Vec<FieldLine> {
    let mut lines = Vec::with_capacity(charges.points.len() * cfg.lines_per_charge);

    for (id, c) in charges.points.iter().enumerate() {
        if c.charge <= 0.0 {
            continue;
        }

        for dir in seeding::seed_directions(cfg.lines_per_charge) {
            if let Some(line) = trace::trace_line(
                charges,
                c.pos,
                dir,
                id,
                c.charge.signum(),
                cfg.max_steps,
                cfg.step_size,
            ) {
                lines.push(line);
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::SOURCE_OFFSET;
    use glam::Vec3;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn empty_set_is_safe_through_every_phase() {
        let mut charges = ChargeSet::from_parts(Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let state = OscillationState::capture(&charges, &mut rng);
        let cfg = Config::default();

        motion_phase(&mut charges, &cfg, 0.1);
        oscillation_phase(&mut charges, &state, 1.0, &cfg);
        let lines = trace_phase(&charges, &cfg);

        assert!(lines.is_empty());
        assert!(charges.markers().is_empty());
        assert!(charges.bounding_box(1.0).is_none());
    }

    #[test]
    fn only_positive_charges_seed_lines() {
        let charges = ChargeSet::from_parts(vec![
            (Vec3::new(-10.0, 0.0, 0.0), -2.0),
            (Vec3::new(10.0, 0.0, 0.0), 0.0),
        ]);
        let cfg = Config::default();

        assert!(trace_phase(&charges, &cfg).is_empty());
    }

    #[test]
    fn dipole_tick_produces_captured_lines() {
        let mut charges = ChargeSet::dipole(8.0, 3.0);
        let mut rng = StdRng::seed_from_u64(42);
        let state = OscillationState::capture(&charges, &mut rng);
        let cfg = Config {
            angular_speed_deg: 15.0,
            ..Config::default()
        };

        motion_phase(&mut charges, &cfg, 0.05);
        oscillation_phase(&mut charges, &state, 0.0, &cfg);
        let lines = trace_phase(&charges, &cfg);

        assert!(!lines.is_empty());

        let positive_pos = charges.points[0].pos;
        let negative_pos = charges.points[1].pos;

        for line in &lines {
            assert_eq!(line.source, 0);
            assert_eq!(line.source_sign, 1.0);

            // Every line starts just off the positive charge.
            let start = line.points[0];
            assert!((start.distance(positive_pos) - SOURCE_OFFSET).abs() < 1e-4);

            for p in &line.points {
                assert!(p.is_finite());
            }

            if line.terminated_on_opposite {
                assert_eq!(*line.points.last().unwrap(), negative_pos);
            }
        }

        // In a dipole, a healthy share of the lines must reach the sink.
        let captured = lines.iter().filter(|l| l.terminated_on_opposite).count();
        assert!(captured > 0, "no line reached the negative charge");
    }

    #[test]
    fn line_count_is_bounded_by_seeds_per_positive_charge() {
        let charges = ChargeSet::quadrupole(10.0, 2.0);
        let cfg = Config {
            lines_per_charge: 12,
            ..Config::default()
        };

        let lines = trace_phase(&charges, &cfg);
        assert!(!lines.is_empty());
        assert!(lines.len() <= 2 * cfg.lines_per_charge);

        // Both positive corners (ids 0 and 2) seed lines.
        assert!(lines.iter().any(|l| l.source == 0));
        assert!(lines.iter().any(|l| l.source == 2));
    }

    #[test]
    fn disabled_oscillation_leaves_charges_untouched() {
        let mut charges = ChargeSet::dipole(6.0, 2.0);
        let mut rng = StdRng::seed_from_u64(3);
        let state = OscillationState::capture(&charges, &mut rng);
        let cfg = Config {
            oscillation_enabled: false,
            ..Config::default()
        };

        oscillation_phase(&mut charges, &state, 9.0, &cfg);
        assert_eq!(charges.points[0].charge, 2.0);
        assert_eq!(charges.points[1].charge, -2.0);
    }
}
