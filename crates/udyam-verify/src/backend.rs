//! # Verification Backend
//!
//! The `VerificationBackend` trait abstracts over whatever answers the
//! wizard's asynchronous checks. Deployments without a real government
//! integration use `SimulatedBackend`, which waits a fixed latency and then
//! answers with deterministic rules:
//!
//! - OTP dispatch always succeeds.
//! - OTP confirmation succeeds only for the configured reference code.
//! - PAN validation always succeeds (the syntax check has already passed).
//! - Submission always succeeds and returns a fresh stamp.

use async_trait::async_trait;

use udyam_core::{AadhaarNumber, Otp, PanNumber, RegistrationRecord};
use udyam_state::{SubmissionStamp, VerificationCall, VerificationFailure};

use crate::config::VerifyConfig;

/// Errors from a verification backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered and the answer was no.
    #[error(transparent)]
    Rejected(#[from] VerificationFailure),

    /// The backend could not be reached or did not answer.
    #[error("verification service unavailable: {reason}")]
    Unavailable { reason: String },
}

impl BackendError {
    /// The failure to record on the verification session.
    pub fn into_failure(self) -> VerificationFailure {
        match self {
            Self::Rejected(failure) => failure,
            other @ Self::Unavailable { .. } => VerificationFailure::Rejected(other.to_string()),
        }
    }
}

/// Adapter trait for the verification service.
///
/// Implementations must be `Send + Sync` so they can be shared across tasks
/// behind an `Arc`. The trait is object-safe to support runtime backend
/// selection.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    /// Dispatch an OTP to the mobile number linked with the Aadhaar.
    async fn send_otp(&self, aadhaar: &AadhaarNumber) -> Result<(), BackendError>;

    /// Check the OTP the user typed.
    async fn confirm_otp(&self, aadhaar: &AadhaarNumber, otp: &Otp) -> Result<(), BackendError>;

    /// Validate a PAN.
    async fn validate_pan(&self, pan: &PanNumber) -> Result<(), BackendError>;

    /// File the completed registration.
    async fn submit_application(
        &self,
        record: &RegistrationRecord,
    ) -> Result<SubmissionStamp, BackendError>;

    /// Human-readable name of this backend implementation.
    fn adapter_name(&self) -> &str;
}

/// Route a ticket's call to the matching backend method.
pub async fn dispatch(
    backend: &dyn VerificationBackend,
    call: &VerificationCall,
) -> Result<(), BackendError> {
    match call {
        VerificationCall::SendOtp { aadhaar } => backend.send_otp(aadhaar).await,
        VerificationCall::ConfirmOtp { aadhaar, otp } => backend.confirm_otp(aadhaar, otp).await,
        VerificationCall::ValidatePan { pan } => backend.validate_pan(pan).await,
    }
}

/// Timer-driven stand-in for the verification service.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    config: VerifyConfig,
}

impl SimulatedBackend {
    pub fn new(config: VerifyConfig) -> Self {
        Self { config }
    }

    /// A backend that answers immediately.
    pub fn instant() -> Self {
        Self::new(VerifyConfig::instant())
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }
}

#[async_trait]
impl VerificationBackend for SimulatedBackend {
    async fn send_otp(&self, aadhaar: &AadhaarNumber) -> Result<(), BackendError> {
        tokio::time::sleep(self.config.verify_latency).await;
        tracing::debug!(%aadhaar, "simulated OTP dispatched");
        Ok(())
    }

    async fn confirm_otp(&self, aadhaar: &AadhaarNumber, otp: &Otp) -> Result<(), BackendError> {
        tokio::time::sleep(self.config.verify_latency).await;
        if otp.as_str() != self.config.reference_otp {
            tracing::debug!(%aadhaar, "simulated OTP mismatch");
            return Err(VerificationFailure::InvalidCode.into());
        }
        Ok(())
    }

    async fn validate_pan(&self, pan: &PanNumber) -> Result<(), BackendError> {
        tokio::time::sleep(self.config.verify_latency).await;
        tracing::debug!(%pan, "simulated PAN validated");
        Ok(())
    }

    async fn submit_application(
        &self,
        _record: &RegistrationRecord,
    ) -> Result<SubmissionStamp, BackendError> {
        tokio::time::sleep(self.config.submit_latency).await;
        Ok(SubmissionStamp::now())
    }

    fn adapter_name(&self) -> &str {
        "SimulatedBackend"
    }
}
