//! # Registration Record
//!
//! The single accumulating entity of a wizard run, and the typed patches that
//! are merged into it.
//!
//! ## Ownership
//!
//! The wizard controller owns the only live `RegistrationRecord` and hands
//! out `&RegistrationRecord` views. Patches are produced exclusively by the
//! step validators in [`crate::validation`], so a patch that exists is a
//! patch whose values passed their format checks.

use serde::{Deserialize, Serialize};

use crate::form::Field;
use crate::identity::{AadhaarNumber, ApplicationId, Otp, PanNumber};
use crate::options::{DisabilityStatus, Gender, OrganizationType, SocialCategory};
use crate::temporal::Timestamp;

/// Validated output of the identity step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPatch {
    pub aadhaar_number: AadhaarNumber,
    pub name: String,
    pub otp: Otp,
}

/// Validated output of the business/PAN step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPatch {
    pub pan_number: PanNumber,
    pub organization_type: OrganizationType,
    pub social_category: SocialCategory,
    pub gender: Gender,
    pub physically_handicapped: DisabilityStatus,
    pub enterprise_name: String,
}

/// A validated patch for one data-entry step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepPatch {
    Identity(IdentityPatch),
    Business(BusinessPatch),
}

impl StepPatch {
    /// Index of the step that produced this patch.
    pub fn step_index(&self) -> usize {
        match self {
            Self::Identity(_) => 0,
            Self::Business(_) => 1,
        }
    }
}

/// Lifecycle status recorded on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Submitted,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitted => f.write_str("SUBMITTED"),
        }
    }
}

/// Final-validation checklist stamped at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationChecklist {
    pub aadhaar_verified: bool,
    pub pan_validated: bool,
    pub data_complete: bool,
    pub terms_accepted: bool,
}

impl VerificationChecklist {
    /// Whether every item is ticked.
    pub fn all_passed(&self) -> bool {
        self.aadhaar_verified && self.pan_validated && self.data_complete && self.terms_accepted
    }
}

/// Metadata derived at submission; absent until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetadata {
    pub submission_timestamp: Timestamp,
    pub application_id: ApplicationId,
    pub status: SubmissionStatus,
    pub terms_accepted: bool,
    pub final_validation: VerificationChecklist,
}

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<AadhaarNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<Otp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<PanNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<OrganizationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_category: Option<SocialCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physically_handicapped: Option<DisabilityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionMetadata>,
}

impl RegistrationRecord {
    /// Overwrite the fields owned by the patch's step. Fields of other steps
    /// are left untouched.
    pub fn apply(&mut self, patch: &StepPatch) {
        match patch {
            StepPatch::Identity(p) => {
                self.aadhaar_number = Some(p.aadhaar_number.clone());
                self.name = Some(p.name.clone());
                self.otp = Some(p.otp.clone());
            }
            StepPatch::Business(p) => {
                self.pan_number = Some(p.pan_number.clone());
                self.organization_type = Some(p.organization_type);
                self.social_category = Some(p.social_category);
                self.gender = Some(p.gender);
                self.physically_handicapped = Some(p.physically_handicapped);
                self.enterprise_name = Some(p.enterprise_name.clone());
            }
        }
    }

    /// Required fields of the given data step that are still unset.
    pub fn missing_fields_for_step(&self, step_index: usize) -> Vec<Field> {
        let checks: Vec<(Field, bool)> = match step_index {
            0 => vec![
                (Field::AadhaarNumber, self.aadhaar_number.is_some()),
                (Field::Name, self.name.is_some()),
                (Field::Otp, self.otp.is_some()),
            ],
            1 => vec![
                (Field::PanNumber, self.pan_number.is_some()),
                (Field::OrganizationType, self.organization_type.is_some()),
                (Field::SocialCategory, self.social_category.is_some()),
                (Field::Gender, self.gender.is_some()),
                (Field::PhysicallyHandicapped, self.physically_handicapped.is_some()),
                (Field::EnterpriseName, self.enterprise_name.is_some()),
            ],
            _ => Vec::new(),
        };
        checks
            .into_iter()
            .filter(|(_, set)| !set)
            .map(|(field, _)| field)
            .collect()
    }

    /// Required fields of both data steps that are still unset.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = self.missing_fields_for_step(0);
        missing.extend(self.missing_fields_for_step(1));
        missing
    }

    /// Whether every field required by the data steps is present.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Whether nothing at all has been recorded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether submission metadata has been stamped.
    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_patch() -> IdentityPatch {
        IdentityPatch {
            aadhaar_number: AadhaarNumber::new("123456789012").unwrap(),
            name: "Test User".into(),
            otp: Otp::new("123456").unwrap(),
        }
    }

    fn business_patch() -> BusinessPatch {
        BusinessPatch {
            pan_number: PanNumber::new("ABCDE1234F").unwrap(),
            organization_type: OrganizationType::Proprietorship,
            social_category: SocialCategory::General,
            gender: Gender::Female,
            physically_handicapped: DisabilityStatus::No,
            enterprise_name: "Test Traders".into(),
        }
    }

    #[test]
    fn default_record_is_empty_and_incomplete() {
        let r = RegistrationRecord::default();
        assert!(r.is_empty());
        assert!(!r.is_complete());
        assert_eq!(r.missing_fields().len(), 9);
    }

    #[test]
    fn apply_identity_leaves_business_untouched() {
        let mut r = RegistrationRecord::default();
        r.apply(&StepPatch::Identity(identity_patch()));
        assert_eq!(r.name.as_deref(), Some("Test User"));
        assert!(r.missing_fields_for_step(0).is_empty());
        assert_eq!(r.missing_fields_for_step(1).len(), 6);
    }

    #[test]
    fn apply_overwrites_same_keys() {
        let mut r = RegistrationRecord::default();
        r.apply(&StepPatch::Identity(identity_patch()));
        let mut edited = identity_patch();
        edited.name = "Edited Name".into();
        r.apply(&StepPatch::Identity(edited));
        assert_eq!(r.name.as_deref(), Some("Edited Name"));
    }

    #[test]
    fn both_patches_complete_the_record() {
        let mut r = RegistrationRecord::default();
        r.apply(&StepPatch::Identity(identity_patch()));
        r.apply(&StepPatch::Business(business_patch()));
        assert!(r.is_complete());
        assert!(!r.is_submitted());
    }

    #[test]
    fn serialization_uses_camel_case_and_skips_unset() {
        let mut r = RegistrationRecord::default();
        r.apply(&StepPatch::Identity(identity_patch()));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["aadhaarNumber"], "123456789012");
        assert_eq!(json["name"], "Test User");
        assert!(json.get("panNumber").is_none());
        assert!(json.get("submission").is_none());
    }

    #[test]
    fn checklist_all_passed() {
        let c = VerificationChecklist {
            aadhaar_verified: true,
            pan_validated: true,
            data_complete: true,
            terms_accepted: false,
        };
        assert!(!c.all_passed());
    }
}
