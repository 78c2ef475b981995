//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identifiers the wizard handles. Each is
//! a distinct type: a [`PanNumber`] cannot be passed where an
//! [`AadhaarNumber`] is expected.
//!
//! ## Validation
//!
//! String-based identifiers validate format at construction time and at
//! deserialization time. [`SessionId`] is UUID-based and always valid.
//!
//! - Aadhaar: UIDAI 12-digit resident number. Whitespace is ignored on input;
//!   the canonical form is the bare 12 digits.
//! - PAN: Income Tax Department permanent account number, `ABCDE1234F`.
//!   Case-sensitive; callers normalize user input first
//!   (see [`crate::format::normalize_pan_input`]).
//! - OTP: 6-digit one-time code.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Implement `Deserialize` for a string newtype by routing the raw string
/// through the type's `new()` constructor, so that invalid values are
/// rejected at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// UUID-based identifiers
// ---------------------------------------------------------------------------

/// Identifier of one wizard session, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// String-based identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// Aadhaar number.
///
/// The constructor accepts both `"123456789012"` and the grouped display form
/// `"1234 5678 9012"` (any whitespace is stripped). Stored as 12 bare digits.
///
/// `Display` renders the masked form so that the full number never ends up
/// in log output by accident; use [`AadhaarNumber::as_str`] or
/// [`AadhaarNumber::formatted`] when the digits are really wanted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AadhaarNumber(String);

impl_validating_deserialize!(AadhaarNumber);

impl AadhaarNumber {
    /// Number of digits in an Aadhaar number.
    pub const DIGITS: usize = 12;

    /// Create an Aadhaar number from raw input, ignoring whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAadhaar`] unless exactly 12 ASCII
    /// digits remain after whitespace is removed.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() != Self::DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidAadhaar(raw));
        }
        Ok(Self(digits))
    }

    /// The canonical 12-digit form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grouped display form: `1234 5678 9012`.
    pub fn formatted(&self) -> String {
        format!("{} {} {}", &self.0[..4], &self.0[4..8], &self.0[8..])
    }

    /// Masked display form for review screens: `XXXX XXXX 9012`.
    pub fn masked(&self) -> String {
        format!("XXXX XXXX {}", &self.0[8..])
    }
}

impl std::fmt::Display for AadhaarNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Permanent Account Number (PAN).
///
/// Exactly 10 characters: five uppercase letters, four digits, one uppercase
/// letter. Lowercase input is rejected here; normalization belongs to the
/// input layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PanNumber(String);

impl_validating_deserialize!(PanNumber);

impl PanNumber {
    /// Number of characters in a PAN.
    pub const LEN: usize = 10;

    /// Create a PAN, validating the `[A-Z]{5}[0-9]{4}[A-Z]` pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPan`] if the pattern does not match.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Self::matches_pattern(&s) {
            return Err(ValidationError::InvalidPan(s));
        }
        Ok(Self(s))
    }

    fn matches_pattern(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == Self::LEN
            && bytes[..5].iter().all(u8::is_ascii_uppercase)
            && bytes[5..9].iter().all(u8::is_ascii_digit)
            && bytes[9].is_ascii_uppercase()
    }

    /// Access the PAN string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PanNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 6-digit one-time password.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Otp(String);

impl_validating_deserialize!(Otp);

impl Otp {
    /// Number of digits in an OTP.
    pub const DIGITS: usize = 6;

    /// Create an OTP, validating that it is exactly 6 ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOtp`] otherwise.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() != Self::DIGITS || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidOtp {
                len: s.chars().count(),
            });
        }
        Ok(Self(s))
    }

    /// Access the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Application identifier assigned at submission: `UD<epoch-millis>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ApplicationId(String);

impl_validating_deserialize!(ApplicationId);

impl ApplicationId {
    const PREFIX: &'static str = "UD";

    /// Parse an application identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidApplicationId`] unless the value is
    /// `UD` followed by at least one digit.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let valid = s
            .strip_prefix(Self::PREFIX)
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()));
        if !valid {
            return Err(ValidationError::InvalidApplicationId(s));
        }
        Ok(Self(s))
    }

    /// Build the identifier for a Unix epoch instant in milliseconds.
    pub fn from_epoch_millis(millis: u64) -> Self {
        Self(format!("{}{millis}", Self::PREFIX))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- AadhaarNumber --

    #[test]
    fn aadhaar_accepts_bare_digits() {
        let a = AadhaarNumber::new("123456789012").unwrap();
        assert_eq!(a.as_str(), "123456789012");
    }

    #[test]
    fn aadhaar_strips_grouping_whitespace() {
        let a = AadhaarNumber::new("1234 5678 9012").unwrap();
        assert_eq!(a.as_str(), "123456789012");
        assert_eq!(a.formatted(), "1234 5678 9012");
    }

    #[test]
    fn aadhaar_strips_tabs_and_leading_space() {
        let a = AadhaarNumber::new(" 1234\t56789012 ").unwrap();
        assert_eq!(a.as_str(), "123456789012");
    }

    #[test]
    fn aadhaar_rejects_invalid() {
        assert!(AadhaarNumber::new("").is_err());
        assert!(AadhaarNumber::new("12345678901").is_err()); // 11 digits
        assert!(AadhaarNumber::new("1234567890123").is_err()); // 13 digits
        assert!(AadhaarNumber::new("1234-5678-9012").is_err()); // dashes are not whitespace
        assert!(AadhaarNumber::new("12345678901a").is_err());
        assert!(AadhaarNumber::new("١٢٣٤٥٦٧٨٩٠١٢").is_err()); // non-ASCII digits
    }

    #[test]
    fn aadhaar_display_is_masked() {
        let a = AadhaarNumber::new("123456789012").unwrap();
        assert_eq!(a.masked(), "XXXX XXXX 9012");
        assert_eq!(a.to_string(), "XXXX XXXX 9012");
    }

    #[test]
    fn aadhaar_serializes_canonical_digits() {
        let a = AadhaarNumber::new("1234 5678 9012").unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"123456789012\"");
    }

    #[test]
    fn aadhaar_deserialize_rejects_invalid() {
        let r: Result<AadhaarNumber, _> = serde_json::from_str("\"12345\"");
        assert!(r.is_err());
    }

    // -- PanNumber --

    #[test]
    fn pan_accepts_pattern() {
        let p = PanNumber::new("ABCDE1234F").unwrap();
        assert_eq!(p.as_str(), "ABCDE1234F");
    }

    #[test]
    fn pan_rejects_invalid() {
        assert!(PanNumber::new("").is_err());
        assert!(PanNumber::new("abcde1234f").is_err()); // case-sensitive
        assert!(PanNumber::new("ABCD12345F").is_err()); // digit in letter block
        assert!(PanNumber::new("ABCDE123FF").is_err()); // letter in digit block
        assert!(PanNumber::new("ABCDE12345").is_err()); // trailing digit
        assert!(PanNumber::new("ABCDE1234FG").is_err()); // 11 chars
        assert!(PanNumber::new("ÄBCDE1234F").is_err());
    }

    // -- Otp --

    #[test]
    fn otp_accepts_six_digits() {
        assert_eq!(Otp::new("123456").unwrap().as_str(), "123456");
        assert!(Otp::new("000000").is_ok());
    }

    #[test]
    fn otp_rejects_invalid() {
        assert!(Otp::new("").is_err());
        assert!(Otp::new("12345").is_err());
        assert!(Otp::new("1234567").is_err());
        assert!(Otp::new("12345a").is_err());
    }

    #[test]
    fn otp_error_does_not_echo_value() {
        let err = Otp::new("98765").unwrap_err();
        assert!(!err.to_string().contains("98765"));
    }

    // -- ApplicationId --

    #[test]
    fn application_id_from_millis() {
        let id = ApplicationId::from_epoch_millis(1_760_000_000_123);
        assert_eq!(id.as_str(), "UD1760000000123");
        assert_eq!(ApplicationId::new(id.as_str()).unwrap(), id);
    }

    #[test]
    fn application_id_rejects_invalid() {
        assert!(ApplicationId::new("UD").is_err());
        assert!(ApplicationId::new("XX123").is_err());
        assert!(ApplicationId::new("UD12a").is_err());
    }

    // -- SessionId --

    #[test]
    fn session_id_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
