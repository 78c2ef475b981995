//! # Step Data Store
//!
//! Holds the accumulating [`RegistrationRecord`]. `merge` is the only path by
//! which step data enters the record; `stamp` is the only path for submission
//! metadata. Both are crate-private so that nothing outside the wizard
//! controller can write.

use udyam_core::{RegistrationRecord, StepPatch, SubmissionMetadata};

use crate::step::WizardStep;

#[derive(Debug, Clone, Default)]
pub struct StepDataStore {
    record: RegistrationRecord,
}

impl StepDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the patch's fields into the record, overwriting prior values.
    ///
    /// The patch must belong to `step`; a mismatched patch is ignored and
    /// reported as `false`.
    pub(crate) fn merge(&mut self, step: WizardStep, patch: &StepPatch) -> bool {
        if patch.step_index() != step.index() {
            tracing::warn!(%step, patch_step = patch.step_index(), "patch does not belong to step");
            return false;
        }
        self.record.apply(patch);
        true
    }

    pub(crate) fn stamp(&mut self, metadata: SubmissionMetadata) {
        self.record.submission = Some(metadata);
    }

    pub(crate) fn clear(&mut self) {
        self.record = RegistrationRecord::default();
    }

    /// Read-only view of the record.
    pub fn snapshot(&self) -> &RegistrationRecord {
        &self.record
    }

    /// Whether every field required by the data steps is present.
    pub fn is_record_complete(&self) -> bool {
        self.record.is_complete()
    }
}
