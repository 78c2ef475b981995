//! # Register Subcommand
//!
//! Runs one registration end to end against the simulated backend: identity
//! step (send and confirm OTP), business step (validate PAN), review and
//! submission. Wizard events are printed as they happen and the receipt is
//! written to `--out`.
//!
//! ```bash
//! udyam register --answers answers.yaml --out receipts/ --latency-ms 0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use udyam_core::{Field, Receipt, StepForm};
use udyam_state::{ErrorKind, VerificationOp, WizardError, WizardStep};
use udyam_verify::{VerifyConfig, WizardSession};

use crate::answers::Answers;

/// Arguments for the register subcommand.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Answers file (JSON, or YAML by `.yaml`/`.yml` extension).
    #[arg(long)]
    pub answers: PathBuf,

    /// Directory the receipt is written into.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Simulated backend latency in milliseconds for every call. Overrides
    /// `UDYAM_VERIFY_LATENCY_MS` and `UDYAM_SUBMIT_LATENCY_MS`.
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Accept the terms and conditions regardless of the answers file.
    #[arg(long)]
    pub terms: bool,
}

/// Execute the register subcommand.
///
/// Exit code 0 on submission, 2 when the wizard refused the answers. Any
/// other failure is returned as an error.
pub async fn run_register(args: &RegisterArgs) -> Result<u8> {
    let answers = Answers::load(&args.answers)?;
    let mut config = VerifyConfig::from_env().context("invalid verification configuration")?;
    if let Some(ms) = args.latency_ms {
        config = config.with_latency(Duration::from_millis(ms));
    }

    let session = WizardSession::simulated(config);
    tracing::info!(backend = %session.backend_name(), answers = %args.answers.display(), "starting registration");

    match drive(&session, &answers, args.terms || answers.terms_accepted).await {
        Ok(receipt) => {
            let path = write_receipt(&args.out, &receipt)?;
            println!("Application ID: {}", receipt.application_id);
            println!("Receipt written to {}", path.display());
            Ok(0)
        }
        Err(err) => match err.downcast_ref::<WizardError>() {
            Some(wizard_err) if is_user_error(wizard_err) => {
                print_wizard_error(wizard_err);
                Ok(2)
            }
            _ => Err(err),
        },
    }
}

/// Walk the wizard through every step with `answers`, printing events, and
/// return the receipt of the submitted record.
pub async fn drive(session: &WizardSession, answers: &Answers, terms_accepted: bool) -> Result<Receipt> {
    let mut identity = answers.identity.clone();
    identity.aadhaar_number =
        session.field_change(WizardStep::Identity, Field::AadhaarNumber, &identity.aadhaar_number);
    identity.otp = session.field_change(WizardStep::Identity, Field::Otp, &identity.otp);
    let identity = StepForm::from(identity);

    step_heading(session);
    session
        .request_verification(VerificationOp::SendOtp, &identity)
        .await
        .context("sending OTP")?;
    session
        .request_verification(VerificationOp::ConfirmOtp, &identity)
        .await
        .context("confirming OTP")?;
    session.advance(&identity).context("completing identity step")?;
    print_events(session);

    let mut business = answers.business.clone();
    business.pan_number =
        session.field_change(WizardStep::Business, Field::PanNumber, &business.pan_number);
    let business = StepForm::from(business);

    step_heading(session);
    session
        .request_verification(VerificationOp::ValidatePan, &business)
        .await
        .context("validating PAN")?;
    session.advance(&business).context("completing business step")?;
    print_events(session);

    step_heading(session);
    let submitted = session.submit(terms_accepted).await;
    print_events(session);
    submitted.context("submitting application")?;

    Ok(session.receipt()?)
}

/// Write `receipt` as `udyam-registration-<id>.json` into `dir`.
pub fn write_receipt(dir: &Path, receipt: &Receipt) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(receipt.file_name());
    let json = receipt.to_json_pretty()?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn is_user_error(err: &WizardError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::Format | ErrorKind::Completeness | ErrorKind::VerificationRejected
    )
}

fn print_wizard_error(err: &WizardError) {
    match err.field_errors() {
        Some(errors) => {
            for (field, issue) in errors.iter() {
                println!("  {field}: {issue}");
            }
        }
        None => println!("  {err}"),
    }
}

fn step_heading(session: &WizardSession) {
    let view = session.view();
    println!(
        "[{:>3.0}%] {}",
        view.progress_percent,
        view.position.label()
    );
}

fn print_events(session: &WizardSession) {
    for event in session.drain_events() {
        println!("  {event}");
    }
}
