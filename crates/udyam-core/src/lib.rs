//! # udyam-core — Foundational Types for the Registration Wizard
//!
//! Leaf crate of the workspace. It defines the data the wizard collects and
//! the pure rules that decide whether that data is acceptable. Every other
//! crate depends on `udyam-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `AadhaarNumber`, `PanNumber`,
//!    `Otp`, `ApplicationId` validate at construction (and at deserialization).
//!    A record field typed `AadhaarNumber` cannot hold twelve letters.
//!
//! 2. **Closed option enums.** Organization type, social category, gender and
//!    the disability flag are enums serialized by their portal label. There is
//!    no "unknown string" state.
//!
//! 3. **Validators are total.** Every function in [`validation`] returns a
//!    `Result` with a field-keyed reason and never panics.
//!
//! 4. **Formatting is idempotent.** The input formatters in [`format`] can be
//!    re-applied to their own output without change, and never turn a valid
//!    value into a different valid value.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `udyam-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod form;
pub mod format;
pub mod identity;
pub mod options;
pub mod receipt;
pub mod record;
pub mod schema;
pub mod temporal;
pub mod validation;

// Re-export primary types for ergonomic imports.
pub use error::{ExportError, ValidationError};
pub use form::{BusinessForm, Field, IdentityForm, StepForm};
pub use format::{format_aadhaar_input, normalize_pan_input, sanitize_otp_input};
pub use identity::{AadhaarNumber, ApplicationId, Otp, PanNumber, SessionId};
pub use options::{DisabilityStatus, Gender, OrganizationType, SocialCategory};
pub use receipt::Receipt;
pub use record::{
    BusinessPatch, IdentityPatch, RegistrationRecord, StepPatch, SubmissionMetadata,
    SubmissionStatus, VerificationChecklist,
};
pub use schema::FormSchema;
pub use temporal::Timestamp;
pub use validation::{FieldErrors, FieldIssue, IssueKind};
