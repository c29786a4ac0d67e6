//! Fixed-decimal number formatting shared by hash keys, overlay text and logs.
//!
//! `format!("{:.N}")` rounds exact halves to even (`12.25` -> `12.2`). The
//! host rounds them away from zero (`12.25` -> `12.3`), and music hash keys
//! must agree with it digit for digit.

/// Digits past the requested precision inspected to detect an exact half.
/// A finite `f64` that is not an exact half differs from one well before this.
const HALF_GUARD_DIGITS: usize = 40;

/// Format `value` with `digits` decimals, rounding exact halves away from zero
///
/// Only values whose binary representation is exactly halfway round up;
/// `1.005` is stored below the half and still gives `"1.00"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Negative zero prints without a sign
    let value = if value == 0.0 { 0.0 } else { value };

    let expanded = format!("{:.*}", digits + HALF_GUARD_DIGITS, value);
    let tail = &expanded[expanded.len() - HALF_GUARD_DIGITS..];
    let is_exact_half = tail.starts_with('5') && tail[1..].bytes().all(|digit| digit == b'0');

    if is_exact_half {
        let half_step = 0.5 / 10f64.powi(digits as i32);
        format!("{:.*}", digits, value + half_step.copysign(value))
    } else {
        format!("{:.*}", digits, value)
    }
}
