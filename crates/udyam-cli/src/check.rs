//! # Check Subcommand
//!
//! Runs one field validator against a value and prints the verdict:
//!
//! ```bash
//! udyam check aadhaar "1234 5678 9012"
//! udyam check pan ABCDE1234F
//! udyam check otp 123456
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};

use udyam_core::validation::{validate_aadhaar, validate_otp, validate_pan};

/// Field a value is checked as.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Aadhaar,
    Pan,
    Otp,
}

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Which validator to run.
    #[arg(value_enum)]
    pub kind: CheckKind,

    /// The raw value, as a user would type it.
    pub value: String,
}

/// Validate `value` as `kind`. `Ok` carries the normalized value, `Err` the
/// message a user would see.
pub fn check_value(kind: CheckKind, value: &str) -> Result<String, String> {
    let verdict = match kind {
        CheckKind::Aadhaar => validate_aadhaar(value).map(|a| a.as_str().to_string()),
        CheckKind::Pan => validate_pan(value).map(|p| p.as_str().to_string()),
        CheckKind::Otp => validate_otp(value).map(|o| o.as_str().to_string()),
    };
    verdict.map_err(|issue| issue.message)
}

/// Execute the check subcommand. Exit code 0 when valid, 1 otherwise.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    match check_value(args.kind, &args.value) {
        Ok(normalized) => {
            println!("OK: {normalized}");
            Ok(0)
        }
        Err(message) => {
            println!("INVALID: {message}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aadhaar_with_spaces_is_normalized() {
        assert_eq!(
            check_value(CheckKind::Aadhaar, "1234 5678 9012").unwrap(),
            "123456789012"
        );
    }

    #[test]
    fn lowercase_pan_is_rejected() {
        assert_eq!(
            check_value(CheckKind::Pan, "abcde1234f").unwrap_err(),
            "Please enter a valid PAN number (Format: ABCDE1234F)"
        );
    }

    #[test]
    fn empty_otp_is_required() {
        assert_eq!(check_value(CheckKind::Otp, "").unwrap_err(), "OTP is required");
        assert_eq!(
            check_value(CheckKind::Otp, "12345").unwrap_err(),
            "Please enter a valid 6-digit OTP"
        );
    }

    #[test]
    fn exit_codes_follow_verdict() {
        let ok = CheckArgs {
            kind: CheckKind::Otp,
            value: "123456".into(),
        };
        assert_eq!(run_check(&ok).unwrap(), 0);
        let bad = CheckArgs {
            kind: CheckKind::Aadhaar,
            value: "12345".into(),
        };
        assert_eq!(run_check(&bad).unwrap(), 1);
    }
}
