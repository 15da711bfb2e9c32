//! Interpolation over numeric stop keys.
//!
//! Shared by camera, source, and composite evaluation. Bracketing is a pair
//! of O(log n) range scans over the stop table; inputs at or beyond the
//! outermost stops clamp to the edge values.

use crate::error::{Result, StyleError};
use crate::value::StyleType;

use super::stops::StopTable;

/// Where an input landed relative to a table's numeric keys.
pub(crate) enum Bracket<'a, V> {
    /// At or beyond an edge stop; no blending.
    Single(&'a V),
    /// Strictly between two stops.
    Span {
        lo_key: f64,
        lo: &'a V,
        hi_key: f64,
        hi: &'a V,
    },
}

/// Locate `x` among the table's numeric keys.
///
/// Returns `None` only for a table with no numeric keys at all, which
/// construction-time validation rules out for the ordered modes.
pub(crate) fn bracket<V>(stops: &StopTable<V>, x: f64) -> Option<Bracket<'_, V>> {
    match stops.floor_numeric(x) {
        None => stops.first_numeric().map(|(_, v)| Bracket::Single(v)),
        Some((lo_key, lo)) => match stops.ceiling_numeric(x) {
            None => Some(Bracket::Single(lo)),
            Some((hi_key, hi)) => Some(Bracket::Span {
                lo_key,
                lo,
                hi_key,
                hi,
            }),
        },
    }
}

/// Interpolation factor in `[0, 1]` for `x` between `lo` and `hi`.
///
/// `base` controls the exponential easing curve; a base of 1 degenerates to
/// the linear fraction.
pub(crate) fn factor(x: f64, lo: f64, hi: f64, base: f64) -> f64 {
    let range = hi - lo;
    if range <= 0.0 {
        return 0.0;
    }
    let progress = x - lo;
    if base == 1.0 {
        progress / range
    } else {
        (base.powf(progress) - 1.0) / (base.powf(range) - 1.0)
    }
}

/// Blend two outputs, failing for types that cannot interpolate.
pub(crate) fn blend<T: StyleType>(lo: &T, hi: &T, t: f64) -> Result<T> {
    T::lerp(lo, hi, t).ok_or_else(|| StyleError::TypeMismatch {
        expected: "an interpolatable type".to_string(),
        found: format!("{} values", T::FAMILY),
    })
}

/// Exponential strategy: bracket, then blend with the eased factor.
pub(crate) fn exponential<T: StyleType>(stops: &StopTable<T>, x: f64, base: f64) -> Result<T> {
    match bracket(stops, x) {
        Some(Bracket::Single(value)) => Ok(value.clone()),
        Some(Bracket::Span {
            lo_key,
            lo,
            hi_key,
            hi,
        }) => blend(lo, hi, factor(x, lo_key, hi_key, base)),
        None => Err(StyleError::malformed("stop table has no numeric keys")),
    }
}

/// Interval strategy: the value of the greatest stop key at or below `x`,
/// clamping to the first stop below the range.
pub(crate) fn interval<V>(stops: &StopTable<V>, x: f64) -> Option<&V> {
    stops
        .floor_numeric(x)
        .map(|(_, v)| v)
        .or_else(|| stops.first_numeric().map(|(_, v)| v))
}
