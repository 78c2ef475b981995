//! # Field and Step Validators
//!
//! Pure, total checks over raw form input. A single-field validator returns
//! the typed value or a [`FieldIssue`]; a step check runs every validator of
//! the step, collects all issues into [`FieldErrors`], and on success yields
//! the typed patch that the step data store merges.
//!
//! Messages are the ones shown next to the input on the registration portal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::form::{BusinessForm, Field, IdentityForm};
use crate::identity::{AadhaarNumber, Otp, PanNumber};
use crate::record::{BusinessPatch, IdentityPatch};

// ─── Issues ──────────────────────────────────────────────────────────

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The value is present but malformed.
    Format,
    /// A required value is empty or still on its default.
    Missing,
    /// The value is well-formed but has not passed asynchronous verification.
    Unverified,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format => f.write_str("FORMAT"),
            Self::Missing => f.write_str("MISSING"),
            Self::Unverified => f.write_str("UNVERIFIED"),
        }
    }
}

/// One field-keyed rejection reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl FieldIssue {
    pub fn format(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Format,
            message: message.into(),
        }
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Missing,
            message: message.into(),
        }
    }

    pub fn unverified(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Unverified,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Field-keyed issues of one step, in form order.
///
/// At most one issue is kept per field: the first one recorded wins, so a
/// missing value is not also reported as malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, FieldIssue>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding exactly one issue.
    pub fn single(field: Field, issue: FieldIssue) -> Self {
        let mut errors = Self::new();
        errors.insert(field, issue);
        errors
    }

    /// Record an issue unless the field already has one.
    pub fn insert(&mut self, field: Field, issue: FieldIssue) {
        self.0.entry(field).or_insert(issue);
    }

    pub fn get(&self, field: Field) -> Option<&FieldIssue> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldIssue)> {
        self.0.iter().map(|(field, issue)| (*field, issue))
    }

    /// Whether any issue is of the given kind.
    pub fn has_kind(&self, kind: IssueKind) -> bool {
        self.0.values().any(|issue| issue.kind == kind)
    }

    /// Whether every issue is a format issue (nothing missing or unverified).
    pub fn is_format_only(&self) -> bool {
        !self.is_empty() && self.0.values().all(|issue| issue.kind == IssueKind::Format)
    }

    /// Add every issue of `other` whose field has none yet.
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, issue) in other.0 {
            self.insert(field, issue);
        }
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Fold a single-field result into this set, returning the value if it
    /// passed.
    fn take<T>(&mut self, field: Field, result: Result<T, FieldIssue>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(issue) => {
                self.insert(field, issue);
                None
            }
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, issue) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {}", issue.message)?;
            first = false;
        }
        Ok(())
    }
}

// ─── Messages ────────────────────────────────────────────────────────

pub const MSG_AADHAAR_REQUIRED: &str = "Aadhaar number is required";
pub const MSG_AADHAAR_FORMAT: &str = "Please enter a valid 12-digit Aadhaar number";
pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_OTP_REQUIRED: &str = "OTP is required";
pub const MSG_OTP_FORMAT: &str = "Please enter a valid 6-digit OTP";
pub const MSG_PAN_REQUIRED: &str = "PAN number is required";
pub const MSG_PAN_FORMAT: &str = "Please enter a valid PAN number (Format: ABCDE1234F)";
pub const MSG_ORGANIZATION_TYPE_REQUIRED: &str = "Please select organization type";
pub const MSG_SOCIAL_CATEGORY_REQUIRED: &str = "Please select social category";
pub const MSG_GENDER_REQUIRED: &str = "Please select gender";
pub const MSG_SELECTION_REQUIRED: &str = "Please select this field";
pub const MSG_ENTERPRISE_NAME_REQUIRED: &str = "Enterprise name is required";
pub const MSG_TERMS_REQUIRED: &str = "Please accept the terms and conditions";

// ─── Single-field validators ─────────────────────────────────────────

/// Aadhaar: whitespace is ignored, exactly 12 ASCII digits must remain.
pub fn validate_aadhaar(raw: &str) -> Result<AadhaarNumber, FieldIssue> {
    if raw.trim().is_empty() {
        return Err(FieldIssue::missing(MSG_AADHAAR_REQUIRED));
    }
    AadhaarNumber::new(raw).map_err(|_| FieldIssue::format(MSG_AADHAAR_FORMAT))
}

/// PAN: exactly `[A-Z]{5}[0-9]{4}[A-Z]`, case-sensitive.
pub fn validate_pan(raw: &str) -> Result<PanNumber, FieldIssue> {
    if raw.trim().is_empty() {
        return Err(FieldIssue::missing(MSG_PAN_REQUIRED));
    }
    PanNumber::new(raw).map_err(|_| FieldIssue::format(MSG_PAN_FORMAT))
}

/// OTP: exactly six ASCII digits.
pub fn validate_otp(raw: &str) -> Result<Otp, FieldIssue> {
    if raw.is_empty() {
        return Err(FieldIssue::missing(MSG_OTP_REQUIRED));
    }
    Otp::new(raw).map_err(|_| FieldIssue::format(MSG_OTP_FORMAT))
}

/// Free text that must not be blank. Returns the trimmed value.
pub fn validate_required_text(raw: &str, message: &str) -> Result<String, FieldIssue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldIssue::missing(message));
    }
    Ok(trimmed.to_string())
}

/// A select input that must not be left on its placeholder.
pub fn require_selection<T: Copy>(value: Option<T>, message: &str) -> Result<T, FieldIssue> {
    value.ok_or_else(|| FieldIssue::missing(message))
}

// ─── Step checks ─────────────────────────────────────────────────────

/// Completeness and syntax of the identity fields that precede the OTP:
/// Aadhaar number and applicant name. This is the gate for sending a code.
pub fn check_identity_fields(form: &IdentityForm) -> Result<(AadhaarNumber, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    let aadhaar = errors.take(Field::AadhaarNumber, validate_aadhaar(&form.aadhaar_number));
    let name = errors.take(Field::Name, validate_required_text(&form.name, MSG_NAME_REQUIRED));
    match (aadhaar, name) {
        (Some(aadhaar), Some(name)) => Ok((aadhaar, name)),
        _ => Err(errors),
    }
}

/// Full identity step: Aadhaar number, name and OTP.
pub fn check_identity_step(form: &IdentityForm) -> Result<IdentityPatch, FieldErrors> {
    let (fields, mut errors) = match check_identity_fields(form) {
        Ok(fields) => (Some(fields), FieldErrors::new()),
        Err(errors) => (None, errors),
    };
    let otp = errors.take(Field::Otp, validate_otp(&form.otp));
    match (fields, otp) {
        (Some((aadhaar_number, name)), Some(otp)) => Ok(IdentityPatch {
            aadhaar_number,
            name,
            otp,
        }),
        _ => Err(errors),
    }
}

/// Full business step: PAN, the four selections and the enterprise name.
pub fn check_business_step(form: &BusinessForm) -> Result<BusinessPatch, FieldErrors> {
    let mut errors = FieldErrors::new();
    let pan_number = errors.take(Field::PanNumber, validate_pan(&form.pan_number));
    let organization_type = errors.take(
        Field::OrganizationType,
        require_selection(form.organization_type, MSG_ORGANIZATION_TYPE_REQUIRED),
    );
    let social_category = errors.take(
        Field::SocialCategory,
        require_selection(form.social_category, MSG_SOCIAL_CATEGORY_REQUIRED),
    );
    let gender = errors.take(
        Field::Gender,
        require_selection(form.gender, MSG_GENDER_REQUIRED),
    );
    let physically_handicapped = errors.take(
        Field::PhysicallyHandicapped,
        require_selection(form.physically_handicapped, MSG_SELECTION_REQUIRED),
    );
    let enterprise_name = errors.take(
        Field::EnterpriseName,
        validate_required_text(&form.enterprise_name, MSG_ENTERPRISE_NAME_REQUIRED),
    );

    match (
        pan_number,
        organization_type,
        social_category,
        gender,
        physically_handicapped,
        enterprise_name,
    ) {
        (
            Some(pan_number),
            Some(organization_type),
            Some(social_category),
            Some(gender),
            Some(physically_handicapped),
            Some(enterprise_name),
        ) => Ok(BusinessPatch {
            pan_number,
            organization_type,
            social_category,
            gender,
            physically_handicapped,
            enterprise_name,
        }),
        _ => Err(errors),
    }
}

/// The terms checkbox of the review step.
pub fn check_terms(accepted: bool) -> Result<(), FieldErrors> {
    if accepted {
        Ok(())
    } else {
        Err(FieldErrors::single(
            Field::Terms,
            FieldIssue::missing(MSG_TERMS_REQUIRED),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{DisabilityStatus, Gender, OrganizationType, SocialCategory};
    use proptest::prelude::*;

    fn identity_form(aadhaar: &str, name: &str, otp: &str) -> IdentityForm {
        IdentityForm {
            aadhaar_number: aadhaar.into(),
            name: name.into(),
            otp: otp.into(),
        }
    }

    fn business_form() -> BusinessForm {
        BusinessForm {
            pan_number: "ABCDE1234F".into(),
            organization_type: Some(OrganizationType::PrivateLimited),
            social_category: Some(SocialCategory::General),
            gender: Some(Gender::Male),
            physically_handicapped: Some(DisabilityStatus::No),
            enterprise_name: "Acme Works".into(),
        }
    }

    // -- single fields --

    #[test]
    fn aadhaar_messages() {
        assert_eq!(validate_aadhaar("").unwrap_err().kind, IssueKind::Missing);
        assert_eq!(validate_aadhaar("   ").unwrap_err().message, MSG_AADHAAR_REQUIRED);
        let issue = validate_aadhaar("1234").unwrap_err();
        assert_eq!(issue.kind, IssueKind::Format);
        assert_eq!(issue.message, MSG_AADHAAR_FORMAT);
        assert_eq!(
            validate_aadhaar("1234 5678 9012").unwrap().as_str(),
            "123456789012"
        );
    }

    #[test]
    fn pan_is_case_sensitive() {
        assert!(validate_pan("ABCDE1234F").is_ok());
        assert_eq!(validate_pan("abcde1234f").unwrap_err().message, MSG_PAN_FORMAT);
        assert_eq!(validate_pan("").unwrap_err().kind, IssueKind::Missing);
    }

    #[test]
    fn otp_messages() {
        assert!(validate_otp("123456").is_ok());
        assert_eq!(validate_otp("12345").unwrap_err().message, MSG_OTP_FORMAT);
        assert_eq!(validate_otp("").unwrap_err().kind, IssueKind::Missing);
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(validate_required_text("  Test User ", MSG_NAME_REQUIRED).unwrap(), "Test User");
        assert!(validate_required_text(" \t", MSG_NAME_REQUIRED).is_err());
    }

    // -- steps --

    #[test]
    fn identity_fields_collects_every_issue() {
        let errors = check_identity_fields(&identity_form("12", "", "")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::AadhaarNumber).unwrap().kind, IssueKind::Format);
        assert_eq!(errors.get(Field::Name).unwrap().kind, IssueKind::Missing);
        assert!(!errors.is_format_only());
    }

    #[test]
    fn identity_fields_ignore_otp() {
        let (aadhaar, name) = check_identity_fields(&identity_form("123456789012", "A", "")).unwrap();
        assert_eq!(aadhaar.as_str(), "123456789012");
        assert_eq!(name, "A");
    }

    #[test]
    fn identity_step_requires_otp() {
        let errors = check_identity_step(&identity_form("123456789012", "A", "12")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.is_format_only());
        let patch = check_identity_step(&identity_form("1234 5678 9012", "Test User", "123456")).unwrap();
        assert_eq!(patch.otp.as_str(), "123456");
    }

    #[test]
    fn business_step_defaults_are_missing() {
        let errors = check_business_step(&BusinessForm::default()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().all(|(_, issue)| issue.kind == IssueKind::Missing));
        assert_eq!(
            errors.get(Field::OrganizationType).unwrap().message,
            MSG_ORGANIZATION_TYPE_REQUIRED
        );
        assert_eq!(
            errors.get(Field::PhysicallyHandicapped).unwrap().message,
            MSG_SELECTION_REQUIRED
        );
    }

    #[test]
    fn business_step_passes() {
        let patch = check_business_step(&business_form()).unwrap();
        assert_eq!(patch.pan_number.as_str(), "ABCDE1234F");
        assert_eq!(patch.enterprise_name, "Acme Works");
    }

    #[test]
    fn terms_issue_is_keyed_on_terms() {
        assert!(check_terms(true).is_ok());
        let errors = check_terms(false).unwrap_err();
        assert_eq!(errors.get(Field::Terms).unwrap().kind, IssueKind::Missing);
    }

    #[test]
    fn first_issue_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Name, FieldIssue::missing("first"));
        errors.insert(Field::Name, FieldIssue::format("second"));
        assert_eq!(errors.get(Field::Name).unwrap().message, "first");
        assert_eq!(errors.to_string(), "name: first");
    }

    #[test]
    fn serializes_as_field_keyed_map() {
        let errors = FieldErrors::single(Field::PanNumber, FieldIssue::format(MSG_PAN_FORMAT));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["panNumber"]["kind"], "format");
    }

    // -- properties --

    fn flip_class(c: char) -> char {
        if c.is_ascii_digit() {
            'A'
        } else {
            '0'
        }
    }

    proptest! {
        #[test]
        fn aadhaar_accepts_all_twelve_digit_strings(digits in "[0-9]{12}") {
            prop_assert!(validate_aadhaar(&digits).is_ok());
            let grouped = format!("{} {} {}", &digits[..4], &digits[4..8], &digits[8..]);
            let normalized = validate_aadhaar(&grouped).unwrap();
            prop_assert_eq!(normalized.as_str(), digits.as_str());
        }

        #[test]
        fn aadhaar_rejects_wrong_length(digits in "[0-9]{1,11}|[0-9]{13,20}") {
            prop_assert!(validate_aadhaar(&digits).is_err());
        }

        #[test]
        fn pan_accepts_pattern(pan in "[A-Z]{5}[0-9]{4}[A-Z]") {
            prop_assert!(validate_pan(&pan).is_ok());
        }

        #[test]
        fn pan_rejects_single_class_flip(pan in "[A-Z]{5}[0-9]{4}[A-Z]", idx in 0usize..10) {
            let flipped: String = pan
                .chars()
                .enumerate()
                .map(|(i, c)| if i == idx { flip_class(c) } else { c })
                .collect();
            prop_assert!(validate_pan(&flipped).is_err());
        }

        #[test]
        fn validators_never_panic(raw in ".{0,32}") {
            let _ = validate_aadhaar(&raw);
            let _ = validate_pan(&raw);
            let _ = validate_otp(&raw);
        }
    }
}
