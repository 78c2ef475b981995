//! # Input Formatters
//!
//! Keystroke-level transforms applied to raw field input before it is shown
//! back to the user. They mirror the portal's input masks.
//!
//! All three are idempotent (`f(f(x)) == f(x)`) and preserve validity: a value
//! that already passes its validator formats to a value that passes with the
//! same canonical result.

use crate::identity::{AadhaarNumber, Otp, PanNumber};

/// Keep digits only, cap at 12, and group in fours: `1234 5678 9012`.
pub fn format_aadhaar_input(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(AadhaarNumber::DIGITS)
        .collect();
    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase, drop anything that is not an ASCII letter or digit, cap at 10.
pub fn normalize_pan_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .take(PanNumber::LEN)
        .collect()
}

/// Keep digits only, cap at 6.
pub fn sanitize_otp_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(Otp::DIGITS)
        .collect()
}
