//! # Wizard Session Driver
//!
//! Pairs a [`Wizard`] with a [`VerificationBackend`] and runs the two-phase
//! operations end to end: lock, begin, unlock, await the backend, lock,
//! complete. The lock is never held across an `.await`, so verifications on
//! different fields overlap and navigation stays responsive while a call is
//! pending.
//!
//! Outcomes are counted with the `metrics` facade:
//! `udyam_verification_total{op,outcome}` and
//! `udyam_submission_total{outcome}`.

use std::sync::Arc;

use parking_lot::Mutex;

use udyam_core::{ApplicationId, ExportError, Field, Receipt, RegistrationRecord, StepForm};
use udyam_state::{
    ErrorKind, VerificationOp, Wizard, WizardError, WizardEvent, WizardStep, WizardView,
};

use crate::backend::{dispatch, SimulatedBackend, VerificationBackend};
use crate::config::VerifyConfig;

/// Shared handle to one wizard run.
#[derive(Clone)]
pub struct WizardSession {
    wizard: Arc<Mutex<Wizard>>,
    backend: Arc<dyn VerificationBackend>,
}

impl std::fmt::Debug for WizardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardSession")
            .field("session_id", &self.wizard.lock().session_id())
            .field("backend", &self.backend.adapter_name())
            .finish()
    }
}

impl WizardSession {
    pub fn new(backend: Arc<dyn VerificationBackend>) -> Self {
        Self::with_wizard(Wizard::new(), backend)
    }

    pub fn with_wizard(wizard: Wizard, backend: Arc<dyn VerificationBackend>) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(wizard)),
            backend,
        }
    }

    /// A session backed by [`SimulatedBackend`].
    pub fn simulated(config: VerifyConfig) -> Self {
        Self::new(Arc::new(SimulatedBackend::new(config)))
    }

    pub fn backend_name(&self) -> String {
        self.backend.adapter_name().to_string()
    }

    // -- Asynchronous operations --

    /// Run one verification operation against the backend.
    ///
    /// Returns `Ok(())` when the backend accepted. A result that arrives
    /// after the step was left, the wizard reset, or the bound field edited
    /// is discarded and reported as [`WizardError::StaleOperation`].
    pub async fn request_verification(
        &self,
        op: VerificationOp,
        form: &StepForm,
    ) -> Result<(), WizardError> {
        let ticket = self.wizard.lock().begin_verification(op, form)?;
        let outcome = dispatch(self.backend.as_ref(), &ticket.call)
            .await
            .map_err(|e| e.into_failure());
        let result = self.wizard.lock().complete_verification(&ticket, outcome);

        let outcome_label = match &result {
            Ok(()) => "succeeded",
            Err(e) if e.kind() == ErrorKind::StaleOperation => "stale",
            Err(_) => "rejected",
        };
        metrics::counter!(
            "udyam_verification_total",
            "op" => op.as_str(),
            "outcome" => outcome_label
        )
        .increment(1);
        result
    }

    /// Submit the reviewed record.
    pub async fn submit(&self, terms_accepted: bool) -> Result<ApplicationId, WizardError> {
        let begun = {
            let mut wizard = self.wizard.lock();
            wizard
                .begin_submission(terms_accepted)
                .map(|ticket| (ticket, wizard.record().clone()))
        };
        let (ticket, record) = match begun {
            Ok(begun) => begun,
            Err(e) => {
                count_submission("refused");
                return Err(e);
            }
        };

        let result = match self.backend.submit_application(&record).await {
            Ok(stamp) => self.wizard.lock().complete_submission(&ticket, stamp),
            Err(e) => Err(self.wizard.lock().fail_submission(&ticket, e.to_string())),
        };
        count_submission(match &result {
            Ok(_) => "succeeded",
            Err(e) if e.kind() == ErrorKind::StaleOperation => "stale",
            Err(_) => "failed",
        });
        result
    }

    // -- Synchronous operations --

    pub fn advance(&self, form: &StepForm) -> Result<WizardStep, WizardError> {
        self.wizard.lock().advance(form)
    }

    pub fn retreat(&self) -> Result<WizardStep, WizardError> {
        self.wizard.lock().retreat()
    }

    pub fn edit_jump(&self, target: WizardStep) -> Result<WizardStep, WizardError> {
        self.wizard.lock().edit_jump(target)
    }

    pub fn reset(&self) {
        self.wizard.lock().reset();
    }

    pub fn field_change(&self, step: WizardStep, field: Field, raw: &str) -> String {
        self.wizard.lock().field_change(step, field, raw)
    }

    pub fn position(&self) -> WizardStep {
        self.wizard.lock().position()
    }

    /// A copy of the record as it stands.
    pub fn record(&self) -> RegistrationRecord {
        self.wizard.lock().record().clone()
    }

    pub fn view(&self) -> WizardView {
        self.wizard.lock().view()
    }

    pub fn drain_events(&self) -> Vec<WizardEvent> {
        self.wizard.lock().drain_events()
    }

    /// The receipt of the submitted record.
    pub fn receipt(&self) -> Result<Receipt, ExportError> {
        Receipt::from_record(self.wizard.lock().record())
    }

    /// Run `f` with read access to the wizard.
    pub fn inspect<R>(&self, f: impl FnOnce(&Wizard) -> R) -> R {
        f(&self.wizard.lock())
    }
}

fn count_submission(outcome: &'static str) {
    metrics::counter!("udyam_submission_total", "outcome" => outcome).increment(1);
}
