//! Timestamp unit normalization.
//!
//! HiTrack logs mix second and millisecond epochs, sometimes written in
//! scientific notation (`1.52E12`). Everything is reduced to whole seconds.
//!
//! The rule is a heuristic: a value written with an `E12` exponent, or whose
//! integer part has exactly 13 digits, is taken as milliseconds. A genuine
//! 13-digit second value would be misread; no such dates occur before the
//! year 33658.

use crate::utils::config::{MILLIS_DIGITS, MILLIS_EXPONENT_MARKER};

/// Normalize a raw timestamp token to seconds since epoch
///
/// **Public** - used by the record parser for `lbs` timestamps
///
/// Returns `None` when the token is not a finite number. The value is
/// truncated toward zero in both units.
pub fn normalize_timestamp(token: &str) -> Option<i64> {
    let token = token.trim();
    let value: f64 = token.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let is_millis =
        token.contains(MILLIS_EXPONENT_MARKER) || integer_digits(value) == MILLIS_DIGITS;
    let seconds = if is_millis {
        value / 1000.0
    } else {
        value
    };

    Some(seconds.trunc() as i64)
}

/// Normalize an integer key (`h-r`, `alti`, `s-r`) to seconds since epoch
pub fn normalize_timestamp_value(value: i64) -> i64 {
    if value.unsigned_abs().to_string().len() == MILLIS_DIGITS {
        value / 1000
    } else {
        value
    }
}

/// Number of decimal digits in the integer part, sign excluded
fn integer_digits(value: f64) -> usize {
    format!("{:.0}", value.trunc().abs()).len()
}
