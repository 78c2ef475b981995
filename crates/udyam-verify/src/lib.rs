//! # udyam-verify — Asynchronous Verification Layer
//!
//! Everything in the wizard that waits lives here:
//!
//! - **Backend** (`backend.rs`): the object-safe [`VerificationBackend`]
//!   trait and [`SimulatedBackend`], which answers after a fixed tokio timer.
//! - **Config** (`config.rs`): [`VerifyConfig`], latency and reference code,
//!   loadable from the environment.
//! - **Session** (`session.rs`): [`WizardSession`], the async driver that
//!   shares a `udyam_state::Wizard` behind a mutex and runs two-phase
//!   operations against the backend.

pub mod backend;
pub mod config;
pub mod session;

pub use backend::{dispatch, BackendError, SimulatedBackend, VerificationBackend};
pub use config::{ConfigError, VerifyConfig};
pub use session::WizardSession;
