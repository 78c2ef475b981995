//! # Wizard Controller
//!
//! Owns the wizard position, the step data store and the verification
//! sessions, and is the only component allowed to change any of them.
//!
//! ## Transitions
//!
//! | Operation    | Valid from          | Result                          |
//! |--------------|---------------------|---------------------------------|
//! | `advance`    | Identity, Business  | next step, step patch merged    |
//! | `retreat`    | Business, Review    | previous step, data kept        |
//! | `edit_jump`  | Review              | Identity or Business, data kept |
//! | `submit`     | Review              | Completion, metadata stamped    |
//! | `reset`      | any                 | Identity, empty record          |
//!
//! ## Two-phase operations
//!
//! Verification and submission are split into `begin_*`, which validates
//! and hands out a ticket, and `complete_*`, which applies the outcome. The
//! controller itself never waits; the asynchronous driver performs the call
//! between the two phases. Every position change and reset bumps the epoch,
//! and a ticket from an older epoch is discarded on completion without
//! touching the record or the sessions.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use udyam_core::validation::{
    check_business_step, check_identity_fields, check_identity_step, check_terms, validate_otp,
};
use udyam_core::{
    format_aadhaar_input, normalize_pan_input, sanitize_otp_input, AadhaarNumber, ApplicationId,
    BusinessForm, Field, FieldErrors, FieldIssue, IdentityForm, PanNumber, RegistrationRecord,
    SessionId, StepForm, StepPatch, SubmissionMetadata, SubmissionStatus, Timestamp,
    VerificationChecklist,
};

use crate::error::WizardError;
use crate::event::WizardEvent;
use crate::progress::{progress_percent, project, ProgressEntry};
use crate::session::{
    confirm_subject, split_confirm_subject, SessionState, SessionTable, VerificationCall,
    VerificationFailure, VerificationOp, VerificationTicket,
};
use crate::step::WizardStep;
use crate::store::StepDataStore;

/// Operation name used in submission errors.
pub const SUBMIT_OPERATION: &str = "submit";

pub const MSG_OTP_NOT_SENT: &str = "Please send the OTP first";
pub const MSG_OTP_NOT_VERIFIED: &str = "Please verify the OTP";
pub const MSG_PAN_NOT_VALIDATED: &str = "Please validate the PAN number";
pub const MSG_INCOMPLETE: &str = "Please complete all required fields before submitting";

// ─── Supporting types ────────────────────────────────────────────────

/// Record of a position change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardTransitionRecord {
    pub from: WizardStep,
    pub to: WizardStep,
    pub timestamp: Timestamp,
    pub reason: String,
}

/// What a successful submission call returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStamp {
    pub submission_timestamp: Timestamp,
    pub application_id: ApplicationId,
}

impl SubmissionStamp {
    /// Stamp for the current instant: `UD<epoch-millis>`.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            submission_timestamp: Timestamp::from_utc(now),
            application_id: ApplicationId::from_epoch_millis(now.timestamp_millis().max(0) as u64),
        }
    }
}

/// Handle for an in-flight submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub epoch: u64,
    pub generation: u64,
}

/// Values verified during this run, used for the final checklist.
#[derive(Debug, Clone, Default)]
struct VerifiedLedger {
    aadhaar: Option<AadhaarNumber>,
    pan: Option<PanNumber>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub op: VerificationOp,
    pub state: SessionState,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub session_id: SessionId,
    pub position: WizardStep,
    pub record: RegistrationRecord,
    pub progress: Vec<ProgressEntry>,
    pub progress_percent: f64,
    pub sessions: Vec<SessionView>,
    pub checklist: VerificationChecklist,
    pub submission_in_flight: bool,
}

// ─── Wizard ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Wizard {
    session_id: SessionId,
    position: WizardStep,
    store: StepDataStore,
    sessions: SessionTable,
    epoch: u64,
    verified: VerifiedLedger,
    submission_generation: u64,
    submission_in_flight: bool,
    transitions: Vec<WizardTransitionRecord>,
    events: Vec<WizardEvent>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// A fresh wizard at the identity step with an empty record.
    pub fn new() -> Self {
        Self::with_session_id(SessionId::new())
    }

    pub fn with_session_id(session_id: SessionId) -> Self {
        Self {
            session_id,
            position: WizardStep::Identity,
            store: StepDataStore::new(),
            sessions: SessionTable::new(),
            epoch: 0,
            verified: VerifiedLedger::default(),
            submission_generation: 0,
            submission_in_flight: false,
            transitions: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn position(&self) -> WizardStep {
        self.position
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn record(&self) -> &RegistrationRecord {
        self.store.snapshot()
    }

    pub fn is_record_complete(&self) -> bool {
        self.store.is_record_complete()
    }

    pub fn session_state(&self, op: VerificationOp) -> &SessionState {
        self.sessions.state(op)
    }

    /// Position changes of the current run. Reset starts a new log whose
    /// first entry is the reset itself.
    pub fn transitions(&self) -> &[WizardTransitionRecord] {
        &self.transitions
    }

    pub fn is_submission_in_flight(&self) -> bool {
        self.submission_in_flight
    }

    /// Form of the current data step pre-filled from the record.
    pub fn prefill(&self) -> Option<StepForm> {
        match self.position {
            WizardStep::Identity => Some(IdentityForm::prefill(self.record()).into()),
            WizardStep::Business => Some(BusinessForm::prefill(self.record()).into()),
            _ => None,
        }
    }

    // -- Verification --

    /// Validate `form` for `op`, mark the session in flight and return the
    /// ticket to complete it with.
    pub fn begin_verification(
        &mut self,
        op: VerificationOp,
        form: &StepForm,
    ) -> Result<VerificationTicket, WizardError> {
        if self.position != op.step() {
            return Err(WizardError::illegal(self.position, op.as_str()));
        }
        if self.sessions.state(op).is_in_flight() {
            return Err(WizardError::InFlight {
                operation: op.as_str(),
            });
        }
        let call = self.verification_call(op, form)?;
        if let VerificationCall::SendOtp { aadhaar } = &call {
            // A code sent to another number voids any confirmation.
            let confirmed_other = self.sessions.invalidate_if(VerificationOp::ConfirmOtp, |subject| {
                split_confirm_subject(subject).map_or(true, |(bound, _)| bound != aadhaar.as_str())
            });
            if confirmed_other {
                tracing::debug!(session_id = %self.session_id, "OTP confirmation discarded by resend");
            }
        }
        let generation = self
            .sessions
            .begin(op, call.subject())
            .ok_or(WizardError::InFlight {
                operation: op.as_str(),
            })?;

        tracing::debug!(session_id = %self.session_id, step = %self.position, %op, "verification started");
        self.events.push(WizardEvent::VerificationStarted { op });
        Ok(VerificationTicket {
            step: self.position,
            epoch: self.epoch,
            generation,
            call,
        })
    }

    fn verification_call(
        &self,
        op: VerificationOp,
        form: &StepForm,
    ) -> Result<VerificationCall, WizardError> {
        match (op, form) {
            (VerificationOp::SendOtp, StepForm::Identity(form)) => {
                let (aadhaar, _name) =
                    check_identity_fields(form).map_err(WizardError::from_field_errors)?;
                Ok(VerificationCall::SendOtp { aadhaar })
            }
            (VerificationOp::ConfirmOtp, StepForm::Identity(form)) => {
                let mut errors = FieldErrors::new();
                let fields = check_identity_fields(form)
                    .map_err(|e| errors.extend(e))
                    .ok();
                let otp = validate_otp(&form.otp)
                    .map_err(|issue| errors.insert(Field::Otp, issue))
                    .ok();
                let (Some((aadhaar, _name)), Some(otp)) = (fields, otp) else {
                    return Err(WizardError::from_field_errors(errors));
                };
                if !self.sessions.verified(VerificationOp::SendOtp, aadhaar.as_str()) {
                    return Err(WizardError::from_field_errors(FieldErrors::single(
                        Field::Otp,
                        FieldIssue::unverified(MSG_OTP_NOT_SENT),
                    )));
                }
                Ok(VerificationCall::ConfirmOtp { aadhaar, otp })
            }
            (VerificationOp::ValidatePan, StepForm::Business(form)) => {
                let patch = check_business_step(form).map_err(WizardError::from_field_errors)?;
                Ok(VerificationCall::ValidatePan {
                    pan: patch.pan_number,
                })
            }
            _ => Err(WizardError::illegal(
                self.position,
                format!("{op} with a step {} form", form.step_index()),
            )),
        }
    }

    /// Apply the outcome of a verification call.
    ///
    /// A ticket issued before the last position change, reset or edit of the
    /// bound field yields [`WizardError::StaleOperation`] and changes nothing.
    /// A negative outcome marks the session failed and is returned as
    /// [`WizardError::VerificationRejected`].
    pub fn complete_verification(
        &mut self,
        ticket: &VerificationTicket,
        outcome: Result<(), VerificationFailure>,
    ) -> Result<(), WizardError> {
        let op = ticket.op();
        if ticket.epoch != self.epoch
            || ticket.step != self.position
            || !self.sessions.is_current(op, ticket.generation)
        {
            tracing::debug!(
                session_id = %self.session_id,
                %op,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "dropping stale verification result"
            );
            return Err(WizardError::StaleOperation {
                operation: op.as_str(),
            });
        }

        match outcome {
            Ok(()) => {
                self.sessions.finish(
                    op,
                    SessionState::Succeeded {
                        subject: ticket.call.subject(),
                    },
                );
                match &ticket.call {
                    VerificationCall::ConfirmOtp { aadhaar, .. } => {
                        self.verified.aadhaar = Some(aadhaar.clone());
                    }
                    VerificationCall::ValidatePan { pan } => {
                        self.verified.pan = Some(pan.clone());
                    }
                    VerificationCall::SendOtp { .. } => {}
                }
                tracing::info!(session_id = %self.session_id, %op, "verification succeeded");
                self.events.push(WizardEvent::VerificationSucceeded { op });
                Ok(())
            }
            Err(failure) => {
                let reason = failure.to_string();
                self.sessions.finish(
                    op,
                    SessionState::Failed {
                        reason: reason.clone(),
                    },
                );
                tracing::info!(session_id = %self.session_id, %op, %reason, "verification rejected");
                self.events.push(WizardEvent::VerificationFailed {
                    op,
                    reason: reason.clone(),
                });
                Err(WizardError::VerificationRejected {
                    operation: op.as_str(),
                    reason,
                })
            }
        }
    }

    // -- Navigation --

    /// Commit the current data step and move to the next one.
    ///
    /// On the identity step the form's Aadhaar and OTP must be exactly the
    /// pair a `ConfirmOtp` call accepted. A wrong code is rejected by that
    /// call as [`WizardError::VerificationRejected`]; `advance` itself only
    /// reports the missing confirmation as a completeness error.
    pub fn advance(&mut self, form: &StepForm) -> Result<WizardStep, WizardError> {
        let from = self.position;
        let patch = match (from, form) {
            (WizardStep::Identity, StepForm::Identity(form)) => {
                let patch = check_identity_step(form).map_err(WizardError::from_field_errors)?;
                let aadhaar = patch.aadhaar_number.as_str();
                let otp_confirmed = self.sessions.verified(VerificationOp::SendOtp, aadhaar)
                    && self.sessions.verified(
                        VerificationOp::ConfirmOtp,
                        &confirm_subject(aadhaar, patch.otp.as_str()),
                    );
                if !otp_confirmed {
                    return Err(WizardError::from_field_errors(FieldErrors::single(
                        Field::Otp,
                        FieldIssue::unverified(MSG_OTP_NOT_VERIFIED),
                    )));
                }
                StepPatch::Identity(patch)
            }
            (WizardStep::Business, StepForm::Business(form)) => {
                let patch = check_business_step(form).map_err(WizardError::from_field_errors)?;
                if !self
                    .sessions
                    .verified(VerificationOp::ValidatePan, patch.pan_number.as_str())
                {
                    return Err(WizardError::from_field_errors(FieldErrors::single(
                        Field::PanNumber,
                        FieldIssue::unverified(MSG_PAN_NOT_VALIDATED),
                    )));
                }
                StepPatch::Business(patch)
            }
            (WizardStep::Identity | WizardStep::Business, _) => {
                return Err(WizardError::illegal(
                    from,
                    format!("advance with a step {} form", form.step_index()),
                ));
            }
            _ => return Err(WizardError::illegal(from, "advance")),
        };

        let to = from.next().ok_or_else(|| WizardError::illegal(from, "advance"))?;
        if !self.store.merge(from, &patch) {
            return Err(WizardError::illegal(from, "merge a patch of another step"));
        }
        self.move_to(to, "step completed");
        self.events.push(WizardEvent::StepAdvanced { from, to });
        Ok(to)
    }

    /// Go back one step, keeping merged data.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        let from = self.position;
        if !matches!(from, WizardStep::Business | WizardStep::Review) {
            return Err(WizardError::illegal(from, "retreat"));
        }
        self.require_no_submission()?;
        let to = from.prev().ok_or_else(|| WizardError::illegal(from, "retreat"))?;
        self.move_to(to, "retreat");
        self.events.push(WizardEvent::StepRetreated { from, to });
        Ok(to)
    }

    /// From the review step, jump back to a data step to edit it.
    pub fn edit_jump(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        let from = self.position;
        if from != WizardStep::Review || !target.is_data_step() {
            return Err(WizardError::illegal(from, format!("edit jump to {target}")));
        }
        self.require_no_submission()?;
        self.move_to(target, "edit");
        self.events.push(WizardEvent::EditJump { from, to: target });
        Ok(target)
    }

    // -- Submission --

    /// Check that the record is complete and the terms are accepted, then
    /// mark the submission in flight.
    pub fn begin_submission(&mut self, terms_accepted: bool) -> Result<SubmissionTicket, WizardError> {
        if self.position != WizardStep::Review {
            return Err(WizardError::illegal(self.position, SUBMIT_OPERATION));
        }
        self.require_no_submission()?;

        let mut errors = FieldErrors::new();
        for field in self.store.snapshot().missing_fields() {
            errors.insert(field, FieldIssue::missing(MSG_INCOMPLETE));
        }
        if let Err(terms) = check_terms(terms_accepted) {
            errors.extend(terms);
        }
        if !errors.is_empty() {
            let err = WizardError::from_field_errors(errors);
            tracing::info!(session_id = %self.session_id, error = %err, "submission refused");
            self.events.push(WizardEvent::SubmissionFailed {
                reason: err.to_string(),
            });
            return Err(err);
        }

        self.submission_generation += 1;
        self.submission_in_flight = true;
        self.events.push(WizardEvent::SubmissionStarted);
        Ok(SubmissionTicket {
            epoch: self.epoch,
            generation: self.submission_generation,
        })
    }

    /// Stamp the submission metadata and move to completion.
    pub fn complete_submission(
        &mut self,
        ticket: &SubmissionTicket,
        stamp: SubmissionStamp,
    ) -> Result<ApplicationId, WizardError> {
        if !self.is_current_submission(ticket) {
            tracing::debug!(session_id = %self.session_id, "dropping stale submission result");
            return Err(WizardError::StaleOperation {
                operation: SUBMIT_OPERATION,
            });
        }
        self.submission_in_flight = false;

        let final_validation = self.checklist(true);
        let application_id = stamp.application_id.clone();
        self.store.stamp(SubmissionMetadata {
            submission_timestamp: stamp.submission_timestamp,
            application_id: stamp.application_id,
            status: SubmissionStatus::Submitted,
            terms_accepted: true,
            final_validation,
        });
        self.move_to(WizardStep::Completion, "submitted");
        tracing::info!(session_id = %self.session_id, %application_id, "application submitted");
        self.events.push(WizardEvent::SubmissionSucceeded {
            application_id: application_id.clone(),
        });
        Ok(application_id)
    }

    /// Settle an in-flight submission that the backend refused. Returns the
    /// error to surface.
    pub fn fail_submission(&mut self, ticket: &SubmissionTicket, reason: impl Into<String>) -> WizardError {
        if !self.is_current_submission(ticket) {
            tracing::debug!(session_id = %self.session_id, "dropping stale submission failure");
            return WizardError::StaleOperation {
                operation: SUBMIT_OPERATION,
            };
        }
        self.submission_in_flight = false;
        let reason = reason.into();
        tracing::warn!(session_id = %self.session_id, %reason, "submission failed");
        self.events.push(WizardEvent::SubmissionFailed {
            reason: reason.clone(),
        });
        WizardError::VerificationRejected {
            operation: SUBMIT_OPERATION,
            reason,
        }
    }

    /// Synchronous submission: both phases with the given stamp.
    pub fn submit(
        &mut self,
        terms_accepted: bool,
        stamp: SubmissionStamp,
    ) -> Result<ApplicationId, WizardError> {
        let ticket = self.begin_submission(terms_accepted)?;
        self.complete_submission(&ticket, stamp)
    }

    // -- Reset --

    /// Back to the identity step with an empty record. Every outstanding
    /// ticket becomes stale.
    pub fn reset(&mut self) {
        self.store.clear();
        self.verified = VerifiedLedger::default();
        self.submission_in_flight = false;
        self.transitions.clear();
        self.move_to(WizardStep::Identity, "reset");
        tracing::info!(session_id = %self.session_id, "wizard reset");
        self.events.push(WizardEvent::WizardReset);
    }

    // -- Input --

    /// Format raw input for `field` and invalidate any verification whose
    /// subject no longer matches it. Returns the formatted value.
    pub fn field_change(&mut self, step: WizardStep, field: Field, raw: &str) -> String {
        let formatted = match field {
            Field::AadhaarNumber => format_aadhaar_input(raw),
            Field::PanNumber => normalize_pan_input(raw),
            Field::Otp => sanitize_otp_input(raw),
            _ => raw.to_string(),
        };
        if step != self.position || field.step_index() != step.index() {
            return formatted;
        }

        let invalidated = match field {
            Field::AadhaarNumber => {
                let digits: String = formatted.chars().filter(|c| !c.is_whitespace()).collect();
                let changed = self.sessions.invalidate_unless(VerificationOp::SendOtp, &digits);
                if changed {
                    self.sessions.invalidate(VerificationOp::ConfirmOtp);
                }
                changed
            }
            Field::Otp => self.sessions.invalidate_if(VerificationOp::ConfirmOtp, |subject| {
                split_confirm_subject(subject).map_or(true, |(_, otp)| otp != formatted.as_str())
            }),
            Field::PanNumber => self
                .sessions
                .invalidate_unless(VerificationOp::ValidatePan, &formatted),
            _ => false,
        };
        if invalidated {
            tracing::debug!(session_id = %self.session_id, %field, "verification invalidated by edit");
        }
        formatted
    }

    // -- Views --

    /// Final-validation checklist for the current record.
    pub fn checklist(&self, terms_accepted: bool) -> VerificationChecklist {
        let record = self.store.snapshot();
        VerificationChecklist {
            aadhaar_verified: self.verified.aadhaar.is_some()
                && self.verified.aadhaar == record.aadhaar_number,
            pan_validated: self.verified.pan.is_some() && self.verified.pan == record.pan_number,
            data_complete: record.is_complete(),
            terms_accepted,
        }
    }

    pub fn view(&self) -> WizardView {
        let record = self.store.snapshot().clone();
        let terms_accepted = record
            .submission
            .as_ref()
            .is_some_and(|submission| submission.terms_accepted);
        WizardView {
            session_id: self.session_id,
            position: self.position,
            progress: project(self.position.index(), WizardStep::STEP_COUNT),
            progress_percent: progress_percent(self.position.index(), WizardStep::STEP_COUNT),
            sessions: self
                .sessions
                .iter()
                .map(|(op, state)| SessionView {
                    op,
                    state: state.clone(),
                })
                .collect(),
            checklist: self.checklist(terms_accepted),
            submission_in_flight: self.submission_in_flight,
            record,
        }
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<WizardEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Internals --

    fn require_no_submission(&self) -> Result<(), WizardError> {
        if self.submission_in_flight {
            return Err(WizardError::InFlight {
                operation: SUBMIT_OPERATION,
            });
        }
        Ok(())
    }

    fn is_current_submission(&self, ticket: &SubmissionTicket) -> bool {
        self.submission_in_flight
            && self.position == WizardStep::Review
            && ticket.epoch == self.epoch
            && ticket.generation == self.submission_generation
    }

    fn move_to(&mut self, to: WizardStep, reason: &str) {
        tracing::info!(session_id = %self.session_id, from = %self.position, %to, reason, "wizard transition");
        self.transitions.push(WizardTransitionRecord {
            from: self.position,
            to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.position = to;
        self.epoch += 1;
        self.sessions.clear();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
