//! Semantic notifications emitted by the wizard into its outbox. The
//! presentation layer drains them and turns them into toasts.

use serde::{Deserialize, Serialize};

use udyam_core::ApplicationId;

use crate::session::VerificationOp;
use crate::step::WizardStep;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WizardEvent {
    VerificationStarted { op: VerificationOp },
    VerificationSucceeded { op: VerificationOp },
    VerificationFailed { op: VerificationOp, reason: String },
    StepAdvanced { from: WizardStep, to: WizardStep },
    StepRetreated { from: WizardStep, to: WizardStep },
    EditJump { from: WizardStep, to: WizardStep },
    SubmissionStarted,
    SubmissionSucceeded { application_id: ApplicationId },
    SubmissionFailed { reason: String },
    WizardReset,
}

impl std::fmt::Display for WizardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VerificationStarted { op } => write!(f, "{op} started"),
            Self::VerificationSucceeded { op } => write!(f, "{op} succeeded"),
            Self::VerificationFailed { op, reason } => write!(f, "{op} failed: {reason}"),
            Self::StepAdvanced { from, to } => write!(f, "advanced {from} -> {to}"),
            Self::StepRetreated { from, to } => write!(f, "retreated {from} -> {to}"),
            Self::EditJump { from, to } => write!(f, "edit jump {from} -> {to}"),
            Self::SubmissionStarted => f.write_str("submission started"),
            Self::SubmissionSucceeded { application_id } => {
                write!(f, "submission succeeded: {application_id}")
            }
            Self::SubmissionFailed { reason } => write!(f, "submission failed: {reason}"),
            Self::WizardReset => f.write_str("wizard reset"),
        }
    }
}
