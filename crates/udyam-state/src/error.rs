//! # Wizard Errors
//!
//! Every rejected wizard operation surfaces as a [`WizardError`]. Callers that
//! only need to decide how to react match on [`WizardError::kind`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use udyam_core::{FieldErrors, IssueKind};

use crate::step::WizardStep;

/// How the caller should treat a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input; fix the field and retry.
    Format,
    /// Something required is missing, unverified or unaccepted.
    Completeness,
    /// The backend answered no; retry without limit.
    VerificationRejected,
    /// A late result for a superseded request; discarded silently.
    StaleOperation,
    /// The caller asked for a transition the current position does not allow.
    IllegalTransition,
    /// The same operation is already running.
    InFlight,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("invalid input: {0}")]
    Format(FieldErrors),

    #[error("incomplete: {0}")]
    Incomplete(FieldErrors),

    #[error("{operation} rejected: {reason}")]
    VerificationRejected {
        operation: &'static str,
        reason: String,
    },

    #[error("stale {operation} result discarded")]
    StaleOperation { operation: &'static str },

    #[error("illegal transition: cannot {action} from {from}")]
    IllegalTransition { from: WizardStep, action: String },

    #[error("{operation} is already in flight")]
    InFlight { operation: &'static str },
}

impl WizardError {
    /// Classify a set of field issues: anything missing or unverified makes
    /// it a completeness failure, otherwise it is a format failure.
    pub fn from_field_errors(errors: FieldErrors) -> Self {
        if errors.has_kind(IssueKind::Missing) || errors.has_kind(IssueKind::Unverified) {
            Self::Incomplete(errors)
        } else {
            Self::Format(errors)
        }
    }

    pub(crate) fn illegal(from: WizardStep, action: impl Into<String>) -> Self {
        Self::IllegalTransition {
            from,
            action: action.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::Incomplete(_) => ErrorKind::Completeness,
            Self::VerificationRejected { .. } => ErrorKind::VerificationRejected,
            Self::StaleOperation { .. } => ErrorKind::StaleOperation,
            Self::IllegalTransition { .. } => ErrorKind::IllegalTransition,
            Self::InFlight { .. } => ErrorKind::InFlight,
        }
    }

    /// The field-keyed issues, for format and completeness failures.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Format(errors) | Self::Incomplete(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use udyam_core::{Field, FieldIssue};

    #[test]
    fn classification() {
        let format = FieldErrors::single(Field::PanNumber, FieldIssue::format("bad"));
        assert_eq!(WizardError::from_field_errors(format).kind(), ErrorKind::Format);

        let mut mixed = FieldErrors::single(Field::PanNumber, FieldIssue::format("bad"));
        mixed.insert(Field::Gender, FieldIssue::missing("pick one"));
        assert_eq!(WizardError::from_field_errors(mixed).kind(), ErrorKind::Completeness);

        let unverified = FieldErrors::single(Field::Otp, FieldIssue::unverified("verify"));
        assert_eq!(WizardError::from_field_errors(unverified).kind(), ErrorKind::Completeness);
    }

    #[test]
    fn display() {
        let err = WizardError::illegal(WizardStep::Completion, "retreat");
        assert_eq!(err.to_string(), "illegal transition: cannot retreat from COMPLETION");
        assert!(err.field_errors().is_none());
    }
}
