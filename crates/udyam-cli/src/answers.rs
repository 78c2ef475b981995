//! Answers file: the inputs a user would type into the two data steps.
//!
//! JSON or YAML, chosen by file extension. Option fields use the portal
//! labels, e.g. `organizationType: "Private Limited Company"`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use udyam_core::{BusinessForm, IdentityForm};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Answers {
    pub identity: IdentityForm,
    pub business: BusinessForm,
    pub terms_accepted: bool,
}

impl Answers {
    /// Read an answers file. `.yaml`/`.yml` parse as YAML, anything else as
    /// JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answers file {}", path.display()))?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml(&content)
                .with_context(|| format!("failed to parse YAML answers {}", path.display()))
        } else {
            Self::from_json(&content)
                .with_context(|| format!("failed to parse JSON answers {}", path.display()))
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use udyam_core::{Gender, OrganizationType};

    const YAML: &str = r#"
identity:
  aadhaarNumber: "1234 5678 9012"
  name: Test User
  otp: "123456"
business:
  panNumber: abcde1234f
  organizationType: Private Limited Company
  socialCategory: General/Open
  gender: Female
  physicallyHandicapped: "No"
  enterpriseName: Test Traders
termsAccepted: true
"#;

    #[test]
    fn yaml_answers_parse_with_labels() {
        let answers = Answers::from_yaml(YAML).unwrap();
        assert_eq!(answers.identity.aadhaar_number, "1234 5678 9012");
        assert_eq!(answers.business.pan_number, "abcde1234f");
        assert_eq!(
            answers.business.organization_type,
            Some(OrganizationType::PrivateLimited)
        );
        assert_eq!(answers.business.gender, Some(Gender::Female));
        assert!(answers.terms_accepted);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let answers = Answers::from_json(r#"{"identity": {"name": "Only Name"}}"#).unwrap();
        assert_eq!(answers.identity.name, "Only Name");
        assert_eq!(answers.business, BusinessForm::default());
        assert!(!answers.terms_accepted);
    }

    #[test]
    fn unknown_option_label_is_an_error() {
        let result =
            Answers::from_json(r#"{"business": {"organizationType": "Trust"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.yml");
        std::fs::write(&path, YAML).unwrap();
        let answers = Answers::load(&path).unwrap();
        assert_eq!(answers.identity.name, "Test User");

        let missing = dir.path().join("absent.json");
        let err = Answers::load(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read answers file"));
    }
}
