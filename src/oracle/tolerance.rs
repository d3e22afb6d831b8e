//! Relative-tolerance comparison of scalars.

use tracing::{debug, warn};

use crate::error::{Error, Mismatch, Result};

/// `|value - reference| / max(|value|, |reference|)`, or `0` when both are zero.
pub fn relative_difference(value: f64, reference: f64) -> f64 {
    let max_abs = value.abs().max(reference.abs());
    if max_abs == 0.0 {
        return 0.0;
    }
    (value - reference).abs() / max_abs
}

/// Whether `relative_tolerance` can ever accept a comparison: finite and positive.
pub fn is_valid_tolerance(relative_tolerance: f64) -> bool {
    relative_tolerance.is_finite() && relative_tolerance > 0.0
}

/// True when `value` and `reference` agree within `relative_tolerance` (exclusive).
///
/// Two zeros always agree. Any NaN never does.
pub fn within_tolerance(value: f64, reference: f64, relative_tolerance: f64) -> bool {
    let max_abs = value.abs().max(reference.abs());
    if max_abs == 0.0 {
        return true;
    }
    (value - reference).abs() / max_abs < relative_tolerance
}

/// A passed tolerance comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceCheck {
    /// Computed value.
    pub value: f64,
    /// Expected value.
    pub reference: f64,
    /// Observed relative difference.
    pub ratio: f64,
    /// Relative tolerance the ratio was held to.
    pub tolerance: f64,
}

/// Compare and report. Fails with [`Mismatch::Tolerance`] carrying the full payload.
pub fn check_tolerance(value: f64, reference: f64, relative_tolerance: f64) -> Result<ToleranceCheck> {
    let ratio = relative_difference(value, reference);
    if within_tolerance(value, reference, relative_tolerance) {
        debug!(value, reference, ratio, tolerance = relative_tolerance, "within tolerance");
        return Ok(ToleranceCheck {
            value,
            reference,
            ratio,
            tolerance: relative_tolerance,
        });
    }
    warn!(value, reference, ratio, tolerance = relative_tolerance, "outside tolerance");
    Err(Error::Mismatch(Mismatch::Tolerance {
        value,
        reference,
        ratio,
        tolerance: relative_tolerance,
    }))
}
