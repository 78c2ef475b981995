//! # udyam-cli — Udyam Registration Command-Line Interface
//!
//! Drives the registration wizard without a browser.
//!
//! ## Subcommands
//!
//! - `register`: Run a whole registration from an answers file and write
//!   the receipt
//! - `schema`: Print or write the form schema
//! - `check`: Run a single field validator
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to the `udyam-*` crates; no wizard rules here.
//! - Handlers return the process exit code; `anyhow` errors are fatal.

pub mod answers;
pub mod check;
pub mod register;
pub mod schema;
