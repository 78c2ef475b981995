//! # Verification Sessions
//!
//! Transient per-operation state for the three asynchronous checks of the
//! data steps. A session never writes the record; a succeeded session only
//! authorizes the merge of its step's fields.
//!
//! ## Staleness
//!
//! Every session carries a generation counter. Editing the bound field,
//! leaving the step, or resetting the wizard bumps it, so a ticket issued
//! before the bump no longer matches and its completion is dropped. At most
//! one operation per session is in flight at a time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use udyam_core::{AadhaarNumber, Field, Otp, PanNumber};

use crate::step::WizardStep;

// ─── Operations ──────────────────────────────────────────────────────

/// An asynchronous verification operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOp {
    /// Dispatch an OTP to the mobile number linked with the Aadhaar.
    SendOtp,
    /// Confirm the OTP the user typed.
    ConfirmOtp,
    /// Validate the PAN.
    ValidatePan,
}

impl VerificationOp {
    pub const ALL: [VerificationOp; 3] = [Self::SendOtp, Self::ConfirmOtp, Self::ValidatePan];

    /// Step that owns the operation.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::SendOtp | Self::ConfirmOtp => WizardStep::Identity,
            Self::ValidatePan => WizardStep::Business,
        }
    }

    /// Field whose value the operation verifies.
    pub fn field(&self) -> Field {
        match self {
            Self::SendOtp => Field::AadhaarNumber,
            Self::ConfirmOtp => Field::Otp,
            Self::ValidatePan => Field::PanNumber,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SendOtp => "send_otp",
            Self::ConfirmOtp => "confirm_otp",
            Self::ValidatePan => "validate_pan",
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for VerificationOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The typed arguments of one verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationCall {
    SendOtp { aadhaar: AadhaarNumber },
    ConfirmOtp { aadhaar: AadhaarNumber, otp: Otp },
    ValidatePan { pan: PanNumber },
}

impl VerificationCall {
    pub fn op(&self) -> VerificationOp {
        match self {
            Self::SendOtp { .. } => VerificationOp::SendOtp,
            Self::ConfirmOtp { .. } => VerificationOp::ConfirmOtp,
            Self::ValidatePan { .. } => VerificationOp::ValidatePan,
        }
    }

    /// Canonical value of the bound field: the Aadhaar digits, the PAN, or
    /// for a confirmation the code together with the Aadhaar it was sent to
    /// (see [`confirm_subject`]).
    pub fn subject(&self) -> String {
        match self {
            Self::SendOtp { aadhaar } => aadhaar.as_str().to_string(),
            Self::ConfirmOtp { aadhaar, otp } => confirm_subject(aadhaar.as_str(), otp.as_str()),
            Self::ValidatePan { pan } => pan.as_str().to_string(),
        }
    }
}

/// Subject of a confirmation: `<aadhaar>:<otp>`. A code only confirms the
/// Aadhaar number it was sent to.
pub fn confirm_subject(aadhaar: &str, otp: &str) -> String {
    format!("{aadhaar}:{otp}")
}

/// Split a confirmation subject into its Aadhaar and OTP parts.
pub fn split_confirm_subject(subject: &str) -> Option<(&str, &str)> {
    subject.split_once(':')
}

/// Handle for an in-flight verification, redeemed with
/// `Wizard::complete_verification`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationTicket {
    pub step: WizardStep,
    pub epoch: u64,
    pub generation: u64,
    pub call: VerificationCall,
}

impl VerificationTicket {
    pub fn op(&self) -> VerificationOp {
        self.call.op()
    }
}

/// A verification that completed with a negative answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    #[error("invalid code")]
    InvalidCode,

    #[error("{0}")]
    Rejected(String),
}

// ─── Session state ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    InFlight {
        subject: String,
    },
    Succeeded {
        subject: String,
    },
    Failed {
        reason: String,
    },
}

impl SessionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    /// The verified value, if the session succeeded.
    pub fn verified_subject(&self) -> Option<&str> {
        match self {
            Self::Succeeded { subject } => Some(subject),
            _ => None,
        }
    }

    /// The bound value of an in-flight or succeeded session.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::InFlight { subject } | Self::Succeeded { subject } => Some(subject),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::InFlight { .. } => f.write_str("IN_FLIGHT"),
            Self::Succeeded { .. } => f.write_str("SUCCEEDED"),
            Self::Failed { .. } => f.write_str("FAILED"),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct VerificationSession {
    state: SessionState,
    generation: u64,
}

impl VerificationSession {
    fn invalidate(&mut self) {
        self.state = SessionState::Idle;
        self.generation += 1;
    }
}

/// The sessions of all three operations.
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    sessions: [VerificationSession; 3],
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, op: VerificationOp) -> &SessionState {
        &self.sessions[op.slot()].state
    }

    pub fn generation(&self, op: VerificationOp) -> u64 {
        self.sessions[op.slot()].generation
    }

    /// Whether `op` succeeded for exactly `subject`.
    pub fn verified(&self, op: VerificationOp, subject: &str) -> bool {
        self.state(op).verified_subject() == Some(subject)
    }

    /// Mark `op` in flight and return the generation a ticket must carry.
    /// `None` if an operation is already in flight.
    pub(crate) fn begin(&mut self, op: VerificationOp, subject: String) -> Option<u64> {
        let session = &mut self.sessions[op.slot()];
        if session.state.is_in_flight() {
            return None;
        }
        session.state = SessionState::InFlight { subject };
        Some(session.generation)
    }

    /// Whether a ticket of `generation` still refers to the in-flight call.
    pub(crate) fn is_current(&self, op: VerificationOp, generation: u64) -> bool {
        let session = &self.sessions[op.slot()];
        session.generation == generation && session.state.is_in_flight()
    }

    /// Settle the in-flight call.
    pub(crate) fn finish(&mut self, op: VerificationOp, state: SessionState) {
        self.sessions[op.slot()].state = state;
    }

    /// Invalidate `op` unless its in-flight or verified subject is already
    /// `subject`. Returns whether anything changed.
    pub(crate) fn invalidate_unless(&mut self, op: VerificationOp, subject: &str) -> bool {
        self.invalidate_if(op, |current| current != subject)
    }

    /// Invalidate `op` if its subject is `stale`, or if it failed. Idle
    /// sessions are left alone. Returns whether anything changed.
    pub(crate) fn invalidate_if(&mut self, op: VerificationOp, stale: impl Fn(&str) -> bool) -> bool {
        let session = &mut self.sessions[op.slot()];
        match session.state.subject() {
            Some(current) if !stale(current) => false,
            None if matches!(session.state, SessionState::Idle) => false,
            _ => {
                session.invalidate();
                true
            }
        }
    }

    pub(crate) fn invalidate(&mut self, op: VerificationOp) {
        self.sessions[op.slot()].invalidate();
    }

    /// Discard every session.
    pub(crate) fn clear(&mut self) {
        for session in &mut self.sessions {
            session.invalidate();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VerificationOp, &SessionState)> {
        VerificationOp::ALL.into_iter().map(|op| (op, self.state(op)))
    }
}
