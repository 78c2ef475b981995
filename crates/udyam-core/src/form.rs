//! # Step Forms
//!
//! What the presentation layer hands to the core when the user presses a
//! step's primary button: the raw, unvalidated values of that step's inputs.
//! Validators turn a form into a typed patch (see [`crate::record`]).

use serde::{Deserialize, Serialize};

use crate::options::{DisabilityStatus, Gender, OrganizationType, SocialCategory};
use crate::record::RegistrationRecord;

/// Every user-facing field of the wizard, in form order.
///
/// The serialized key matches the record's JSON key, so a field-keyed error
/// map lines up with the record it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    AadhaarNumber,
    Name,
    Otp,
    PanNumber,
    OrganizationType,
    SocialCategory,
    Gender,
    PhysicallyHandicapped,
    EnterpriseName,
    /// The terms-and-conditions checkbox of the review step.
    Terms,
}

impl Field {
    /// The JSON key of this field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::AadhaarNumber => "aadhaarNumber",
            Self::Name => "name",
            Self::Otp => "otp",
            Self::PanNumber => "panNumber",
            Self::OrganizationType => "organizationType",
            Self::SocialCategory => "socialCategory",
            Self::Gender => "gender",
            Self::PhysicallyHandicapped => "physicallyHandicapped",
            Self::EnterpriseName => "enterpriseName",
            Self::Terms => "terms",
        }
    }

    /// Index of the step that owns this field.
    pub fn step_index(&self) -> usize {
        match self {
            Self::AadhaarNumber | Self::Name | Self::Otp => 0,
            Self::PanNumber
            | Self::OrganizationType
            | Self::SocialCategory
            | Self::Gender
            | Self::PhysicallyHandicapped
            | Self::EnterpriseName => 1,
            Self::Terms => 2,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw input of the identity (Aadhaar) step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityForm {
    pub aadhaar_number: String,
    pub name: String,
    pub otp: String,
}

impl IdentityForm {
    /// Pre-fill from previously merged values.
    pub fn prefill(record: &RegistrationRecord) -> Self {
        Self {
            aadhaar_number: record
                .aadhaar_number
                .as_ref()
                .map(|a| a.formatted())
                .unwrap_or_default(),
            name: record.name.clone().unwrap_or_default(),
            otp: record
                .otp
                .as_ref()
                .map(|o| o.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Raw input of the business/PAN step.
///
/// Select inputs are `None` until the user picks an option; that is the
/// "default" state the completeness check rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessForm {
    pub pan_number: String,
    pub organization_type: Option<OrganizationType>,
    pub social_category: Option<SocialCategory>,
    pub gender: Option<Gender>,
    pub physically_handicapped: Option<DisabilityStatus>,
    pub enterprise_name: String,
}

impl BusinessForm {
    /// Pre-fill from previously merged values.
    pub fn prefill(record: &RegistrationRecord) -> Self {
        Self {
            pan_number: record
                .pan_number
                .as_ref()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            organization_type: record.organization_type,
            social_category: record.social_category,
            gender: record.gender,
            physically_handicapped: record.physically_handicapped,
            enterprise_name: record.enterprise_name.clone().unwrap_or_default(),
        }
    }
}

/// A committed form for one of the two data-entry steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum StepForm {
    Identity(IdentityForm),
    Business(BusinessForm),
}

impl StepForm {
    /// Index of the step this form belongs to.
    pub fn step_index(&self) -> usize {
        match self {
            Self::Identity(_) => 0,
            Self::Business(_) => 1,
        }
    }
}

impl From<IdentityForm> for StepForm {
    fn from(form: IdentityForm) -> Self {
        Self::Identity(form)
    }
}

impl From<BusinessForm> for StepForm {
    fn from(form: BusinessForm) -> Self {
        Self::Business(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_match_serde() {
        for field in [Field::AadhaarNumber, Field::PhysicallyHandicapped, Field::Terms] {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }

    #[test]
    fn field_step_ownership() {
        assert_eq!(Field::Otp.step_index(), 0);
        assert_eq!(Field::EnterpriseName.step_index(), 1);
        assert_eq!(Field::Terms.step_index(), 2);
    }

    #[test]
    fn prefill_from_empty_record_is_blank() {
        let record = RegistrationRecord::default();
        assert_eq!(IdentityForm::prefill(&record), IdentityForm::default());
        assert_eq!(BusinessForm::prefill(&record), BusinessForm::default());
    }

    #[test]
    fn business_form_deserializes_with_missing_selects() {
        let form: BusinessForm =
            serde_json::from_str(r#"{"panNumber":"ABCDE1234F","gender":"Female"}"#).unwrap();
        assert_eq!(form.gender, Some(Gender::Female));
        assert!(form.organization_type.is_none());
        assert!(form.enterprise_name.is_empty());
    }

    #[test]
    fn step_form_tagged() {
        let form = StepForm::from(IdentityForm::default());
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["step"], "identity");
        assert_eq!(form.step_index(), 0);
    }
}
