//! # Error Types
//!
//! Construction and export errors for the core types. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Field-keyed validation reasons (the ones surfaced next to an input) live
//! in [`crate::validation`]; the errors here are what the typed constructors
//! return when handed a malformed value.

use thiserror::Error;

/// A value could not be turned into one of the validated core types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not 12 digits once whitespace is removed.
    #[error("invalid Aadhaar number: expected 12 digits, got {0:?}")]
    InvalidAadhaar(String),

    /// Does not match `[A-Z]{5}[0-9]{4}[A-Z]`.
    #[error("invalid PAN: expected format ABCDE1234F, got {0:?}")]
    InvalidPan(String),

    /// Not exactly 6 digits. The rejected value is not echoed.
    #[error("invalid OTP: expected 6 digits, got {len} characters")]
    InvalidOtp {
        /// Length of the rejected input, in characters.
        len: usize,
    },

    /// Not of the form `UD<digits>`.
    #[error("invalid application id: {0:?}")]
    InvalidApplicationId(String),

    /// Not a UTC RFC 3339 timestamp.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Label does not name any option of the given list.
    #[error("unknown {kind} option: {label:?}")]
    UnknownOption {
        /// Which option list was consulted.
        kind: &'static str,
        /// The label that matched nothing.
        label: String,
    },
}

/// Error while producing the downloadable receipt.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The record has no submission metadata yet.
    #[error("record has not been submitted; no receipt can be produced")]
    NotSubmitted,

    /// JSON serialization failed.
    #[error("receipt serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
