//! # Wizard Steps
//!
//! The closed set of wizard positions.
//!
//! ```text
//! Identity ──▶ Business ──▶ Review ──▶ Completion
//!    ▲            ▲  │         │
//!    │            └──┼─────────┤  (retreat / edit jump)
//!    └───────────────┴─────────┘
//!
//! reset: any ──▶ Identity
//! ```

use serde::{Deserialize, Serialize};

/// Position of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WizardStep {
    /// Step 0: Aadhaar number, name and OTP verification.
    Identity = 0,
    /// Step 1: PAN validation and business details.
    Business = 1,
    /// Step 2: read-only review, terms acceptance and submission.
    Review = 2,
    /// Step 3: terminal; left only through reset.
    Completion = 3,
}

impl WizardStep {
    /// Number of wizard positions.
    pub const STEP_COUNT: usize = 4;

    /// Every step, in order.
    pub const ALL: [WizardStep; 4] = [Self::Identity, Self::Business, Self::Review, Self::Completion];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label shown in the progress indicator.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Identity => "Aadhaar Verification",
            Self::Business => "PAN & Business Details",
            Self::Review => "Review & Confirm",
            Self::Completion => "Completion",
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Whether the step collects form input.
    pub fn is_data_step(&self) -> bool {
        matches!(self, Self::Identity | Self::Business)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completion)
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Identity => "IDENTITY",
            Self::Business => "BUSINESS",
            Self::Review => "REVIEW",
            Self::Completion => "COMPLETION",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_index(step.index()), Some(step));
        }
        assert_eq!(WizardStep::from_index(4), None);
    }

    #[test]
    fn next_and_prev() {
        assert_eq!(WizardStep::Identity.next(), Some(WizardStep::Business));
        assert_eq!(WizardStep::Completion.next(), None);
        assert_eq!(WizardStep::Identity.prev(), None);
        assert_eq!(WizardStep::Review.prev(), Some(WizardStep::Business));
    }

    #[test]
    fn display_is_screaming_case() {
        assert_eq!(WizardStep::Business.to_string(), "BUSINESS");
        assert_eq!(WizardStep::Completion.label(), "Completion");
        assert!(WizardStep::Completion.is_terminal());
        assert!(!WizardStep::Review.is_data_step());
    }
}
