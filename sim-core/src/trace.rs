//! RK4 field-line (streamline) tracing with termination rules.

use crate::charge::ChargeSet;
use crate::field::direction_at;
use crate::types::ChargeId;
use glam::Vec3;

/// Capture radius around an opposite-sign charge; a line entering it ends on
/// that charge.
pub const SINK_RADIUS: f32 = 1.0;

/// Step displacement below which the line is considered static (near a
/// field zero or far from every charge) and tracing stops.
pub const MIN_STEP: f32 = 0.001;

/// Offset along the seed direction that moves the start point off the
/// source charge's singularity.
pub const SOURCE_OFFSET: f32 = 0.1;

/// A traced field line: an ordered polyline of world-space points, tagged
/// for downstream coloring.
#[derive(Debug, Clone)]
pub struct FieldLine {
    pub points: Vec<Vec3>,
    /// Index of the charge this line was seeded from.
    pub source: ChargeId,
    /// Sign of the source charge at seeding time.
    pub source_sign: f32,
    /// `true` when the line ended inside the capture radius of a charge of
    /// opposite sign (its final point is that charge's position).
    pub terminated_on_opposite: bool,
}

/// Integrates one field line from `start` along `initial_dir`.
///
/// The streamline derivative is the *normalized* field direction, sampled at
/// the four classic RK4 evaluation points, so the line advances at unit
/// speed rather than at field-strength speed. Each iteration appends the
/// current point, takes one step, and then checks the termination rules in
/// order:
///
/// 1. `|delta| < MIN_STEP` — the line has gone nearly static; stop.
/// 2. The new position lies within [`SINK_RADIUS`] of a charge whose sign is
///    opposite `source_sign` — append that charge's position as the final
///    point, flag the capture, and stop.
///
/// A line that exhausts `max_steps` without either condition simply ends
/// unterminated at its last appended point.
///
/// ### Returns
/// The traced [`FieldLine`], or `None` when fewer than two points were
/// collected (degenerate lines are discarded, not rendered).
pub fn trace_line(
    charges: &ChargeSet,
    start: Vec3,
    initial_dir: Vec3,
    source: ChargeId,
    source_sign: f32,
    max_steps: usize,
    step_size: f32,
) -> Option<FieldLine> {
    let mut points = Vec::with_capacity(max_steps.min(1024));
    let mut pos = start + initial_dir * SOURCE_OFFSET;
    let mut terminated_on_opposite = false;

    'steps: for _ in 0..max_steps {
        points.push(pos);

        let h = step_size;
        let k1 = direction_at(charges, pos);
        let k2 = direction_at(charges, pos + 0.5 * h * k1);
        let k3 = direction_at(charges, pos + 0.5 * h * k2);
        let k4 = direction_at(charges, pos + h * k3);

        let delta = (h / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        pos += delta;

        if delta.length() < MIN_STEP {
            break;
        }

        for c in &charges.points {
            if c.charge * source_sign < 0.0 && pos.distance(c.pos) < SINK_RADIUS {
                points.push(c.pos);
                terminated_on_opposite = true;
                break 'steps;
            }
        }
    }

    if points.len() < 2 {
        return None;
    }

    Some(FieldLine {
        points,
        source,
        source_sign,
        terminated_on_opposite,
    })
}
