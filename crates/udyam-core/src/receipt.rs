//! # Registration Receipt
//!
//! The downloadable document produced from a submitted record. The core only
//! builds and serializes it; writing the file is the caller's business.
//!
//! The receipt carries a SHA-256 digest of the record's JSON serialization so
//! that a receipt can be checked against the record it claims to describe.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ExportError;
use crate::identity::ApplicationId;
use crate::record::RegistrationRecord;
use crate::temporal::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub application_id: ApplicationId,
    pub submission_timestamp: Timestamp,
    pub registration: RegistrationRecord,
    /// `sha256:<hex>` over the serialized `registration`.
    pub digest: String,
}

impl Receipt {
    /// Build the receipt of a submitted record.
    ///
    /// # Errors
    ///
    /// [`ExportError::NotSubmitted`] if the record carries no submission
    /// metadata.
    pub fn from_record(record: &RegistrationRecord) -> Result<Self, ExportError> {
        let submission = record.submission.as_ref().ok_or(ExportError::NotSubmitted)?;
        Ok(Self {
            application_id: submission.application_id.clone(),
            submission_timestamp: submission.submission_timestamp,
            registration: record.clone(),
            digest: record_digest(record)?,
        })
    }

    /// Whether `digest` matches the embedded registration.
    pub fn verify_digest(&self) -> Result<bool, ExportError> {
        Ok(record_digest(&self.registration)? == self.digest)
    }

    /// `udyam-registration-<application id>.json`
    pub fn file_name(&self) -> String {
        format!("udyam-registration-{}.json", self.application_id)
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn record_digest(record: &RegistrationRecord) -> Result<String, ExportError> {
    let bytes = serde_json::to_vec(record)?;
    let hash = Sha256::digest(&bytes);
    let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("sha256:{hex}"))
}
