//! Superposed electric-field evaluation for a set of point charges.

use crate::charge::ChargeSet;
use glam::Vec3;
use std::f32::consts::PI;

/// Softening term added to squared distances so that evaluating the field
/// at (or very near) a charge's own position stays finite.
pub const SOFTENING: f32 = 0.001;

/// Vacuum permittivity ε₀ in F/m.
pub const VACUUM_PERMITTIVITY: f32 = 8.85e-12;

/// Evaluates the total electric field at `pos`.
///
/// Each charge contributes `q / (4π·ε₀) · r̂ / (|r|² + ε)` where `r` points
/// from the charge to `pos`; contributions are summed over the whole set.
/// An empty set (or a set of zero charges) yields `Vec3::ZERO`.
///
/// This is the innermost hot path of the tracer: it is pure, allocation-free,
/// and safe to call at any position, including exactly on a charge (the
/// degenerate direction resolves to zero via [`Vec3::normalize_or_zero`]).
pub fn field_at(charges: &ChargeSet, pos: Vec3) -> Vec3 {
    let mut total = Vec3::ZERO;
    for c in &charges.points {
        let r = pos - c.pos;
        let dist_sqr = r.length_squared() + SOFTENING;
        let coulomb = c.charge / (4.0 * PI * VACUUM_PERMITTIVITY);
        total += r.normalize_or_zero() * coulomb / dist_sqr;
    }
    total
}

/// The normalized field direction at `pos`, or `Vec3::ZERO` where the field
/// vanishes. This is the derivative used for unit-speed streamline tracing.
pub fn direction_at(charges: &ChargeSet, pos: Vec3) -> Vec3 {
    field_at(charges, pos).normalize_or_zero()
}
