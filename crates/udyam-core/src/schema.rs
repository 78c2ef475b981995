//! # Form Schema
//!
//! Machine-readable description of the two data-entry steps: every field's
//! key, input kind, pattern, required flag, bilingual label and option list,
//! plus human-readable validation rules. Built from the same enums and
//! constants the validators use, so the exported schema cannot drift from the
//! checks actually applied.

use serde::{Deserialize, Serialize};

use crate::form::Field;
use crate::options::{DisabilityStatus, Gender, OrganizationType, SocialCategory};

/// Regex of a valid Aadhaar number (canonical form).
pub const AADHAAR_PATTERN: &str = "^[0-9]{12}$";
/// Regex of a valid PAN.
pub const PAN_PATTERN: &str = "^[A-Z]{5}[0-9]{4}[A-Z]{1}$";
/// Regex of a valid OTP.
pub const OTP_PATTERN: &str = "^[0-9]{6}$";

/// Kind of input widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: Field,
    #[serde(rename = "type")]
    pub input: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub required: bool,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldSchema {
    fn text(name: Field, label: &str, pattern: Option<&str>) -> Self {
        Self {
            name,
            input: InputKind::Text,
            pattern: pattern.map(str::to_string),
            required: true,
            label: label.to_string(),
            options: Vec::new(),
        }
    }

    fn select(name: Field, label: &str, options: Vec<&'static str>) -> Self {
        Self {
            name,
            input: InputKind::Select,
            pattern: None,
            required: true,
            label: label.to_string(),
            options: options.into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSchema {
    pub title: String,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStructure {
    pub step1: StepSchema,
    pub step2: StepSchema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    pub aadhaar: String,
    pub pan: String,
    pub otp: String,
    pub real_time_validation: bool,
    pub bilingual: bool,
}

/// The complete exported schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_structure: FormStructure,
    pub validation_rules: ValidationRules,
}

impl FormSchema {
    /// File name used when the schema is saved.
    pub const FILE_NAME: &'static str = "udyam-form-schema.json";

    /// The schema of the Udyam registration wizard.
    pub fn udyam() -> Self {
        let step1 = StepSchema {
            title: "Aadhaar Verification".to_string(),
            fields: vec![
                FieldSchema::text(
                    Field::AadhaarNumber,
                    "Aadhaar Number / आधार संख्या",
                    Some(AADHAAR_PATTERN),
                ),
                FieldSchema::text(Field::Name, "Name of Entrepreneur / उद्यमी का नाम", None),
                FieldSchema::text(Field::Otp, "Enter OTP / ओटीपी दर्ज करें", Some(OTP_PATTERN)),
            ],
        };
        let step2 = StepSchema {
            title: "PAN & Business Details".to_string(),
            fields: vec![
                FieldSchema::text(Field::PanNumber, "PAN Number / पैन संख्या", Some(PAN_PATTERN)),
                FieldSchema::select(
                    Field::OrganizationType,
                    "Type of Organization",
                    OrganizationType::labels(),
                ),
                FieldSchema::select(
                    Field::SocialCategory,
                    "Social Category",
                    SocialCategory::labels(),
                ),
                FieldSchema::select(Field::Gender, "Gender", Gender::labels()),
                FieldSchema::select(
                    Field::PhysicallyHandicapped,
                    "Physically Handicapped",
                    DisabilityStatus::labels(),
                ),
                FieldSchema::text(Field::EnterpriseName, "Name of Enterprise/Business", None),
            ],
        };
        Self {
            form_structure: FormStructure { step1, step2 },
            validation_rules: ValidationRules {
                aadhaar: "12-digit numeric format".to_string(),
                pan: "5 letters + 4 digits + 1 letter format".to_string(),
                otp: "6-digit numeric code".to_string(),
                real_time_validation: true,
                bilingual: true,
            },
        }
    }

    /// Look up a field's entry in either step.
    pub fn field(&self, field: Field) -> Option<&FieldSchema> {
        self.form_structure
            .step1
            .fields
            .iter()
            .chain(self.form_structure.step2.fields.iter())
            .find(|entry| entry.name == field)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_data_field_is_described() {
        let schema = FormSchema::udyam();
        assert_eq!(schema.form_structure.step1.fields.len(), 3);
        assert_eq!(schema.form_structure.step2.fields.len(), 6);
        for entry in &schema.form_structure.step1.fields {
            assert!(entry.required);
            assert_eq!(entry.name.step_index(), 0);
        }
        for entry in &schema.form_structure.step2.fields {
            assert!(entry.required);
            assert_eq!(entry.name.step_index(), 1);
        }
        assert!(schema.field(Field::Terms).is_none());
    }

    #[test]
    fn options_come_from_enums() {
        let schema = FormSchema::udyam();
        let org = schema.field(Field::OrganizationType).unwrap();
        assert_eq!(org.input, InputKind::Select);
        assert_eq!(org.options.len(), OrganizationType::ALL.len());
        assert_eq!(org.options[2], "Hindu Undivided Family (HUF)");
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(FormSchema::udyam()).unwrap();
        let aadhaar = &json["formStructure"]["step1"]["fields"][0];
        assert_eq!(aadhaar["name"], "aadhaarNumber");
        assert_eq!(aadhaar["type"], "text");
        assert_eq!(aadhaar["pattern"], AADHAAR_PATTERN);
        assert!(json["formStructure"]["step1"]["fields"][1].get("pattern").is_none());
        assert_eq!(json["validationRules"]["realTimeValidation"], true);
    }

    #[test]
    fn pretty_json_parses_back() {
        let schema = FormSchema::udyam();
        let text = schema.to_json_pretty().unwrap();
        let back: FormSchema = serde_json::from_str(&text).unwrap();
        assert_eq!(back, schema);
    }
}
