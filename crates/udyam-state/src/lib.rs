//! # udyam-state — Registration Wizard State Machine
//!
//! The synchronous heart of the wizard. A [`Wizard`] owns the position, the
//! accumulating record and the verification sessions; every change to any of
//! them goes through one of its transition methods.
//!
//! ## Modules
//!
//! - **Steps** (`step.rs`): the four positions `Identity → Business → Review
//!   → Completion`.
//! - **Store** (`store.rs`): the step data store, the only writer of the
//!   record.
//! - **Sessions** (`session.rs`): per-operation verification state, tickets
//!   and generation counters for stale-result detection.
//! - **Progress** (`progress.rs`): pure projection to progress-indicator
//!   entries.
//! - **Wizard** (`wizard.rs`): the controller.
//!
//! ## Concurrency
//!
//! Nothing here awaits. Asynchronous verification is split into a
//! `begin_*` call that returns a ticket and a `complete_*` call that applies
//! the result; the driver in `udyam-verify` awaits the backend in between
//! without holding the wizard.

pub mod error;
pub mod event;
pub mod progress;
pub mod session;
pub mod step;
pub mod store;
pub mod wizard;

pub use error::{ErrorKind, WizardError};
pub use event::WizardEvent;
pub use progress::{progress_percent, project, ProgressEntry, StepStatus};
pub use session::{
    confirm_subject, split_confirm_subject, SessionState, SessionTable, VerificationCall,
    VerificationFailure, VerificationOp, VerificationTicket,
};
pub use step::WizardStep;
pub use store::StepDataStore;
pub use wizard::{
    SessionView, SubmissionStamp, SubmissionTicket, Wizard, WizardTransitionRecord, WizardView,
    SUBMIT_OPERATION,
};
