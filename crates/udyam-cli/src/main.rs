//! # udyam CLI entry point
//!
//! Parses command-line arguments, installs logging (and optionally the
//! Prometheus recorder), and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

use udyam_cli::check::{run_check, CheckArgs};
use udyam_cli::register::{run_register, RegisterArgs};
use udyam_cli::schema::{run_schema, SchemaArgs};

/// Udyam registration wizard.
///
/// Runs MSME registrations against the simulated verification service,
/// exports the form schema, and checks single field values.
#[derive(Parser, Debug)]
#[command(name = "udyam", version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print Prometheus metrics on exit.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a registration from an answers file and write the receipt.
    Register(RegisterArgs),

    /// Print or write the form schema.
    Schema(SchemaArgs),

    /// Validate a single Aadhaar, PAN or OTP value.
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let metrics = if cli.metrics {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("metrics recorder not installed: {e}");
                None
            }
        }
    } else {
        None
    };

    let result = match &cli.command {
        Commands::Register(args) => run_register(args).await,
        Commands::Schema(args) => run_schema(args),
        Commands::Check(args) => run_check(args),
    };

    if let Some(handle) = metrics {
        print_metrics(&handle);
    }

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` if set, `info` otherwise.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_metrics(handle: &PrometheusHandle) {
    println!();
    print!("{}", handle.render());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use udyam_cli::check::CheckKind;

    #[test]
    fn cli_parse_register() {
        let cli = Cli::try_parse_from([
            "udyam",
            "register",
            "--answers",
            "answers.yaml",
            "--latency-ms",
            "0",
            "--terms",
        ])
        .unwrap();
        if let Commands::Register(args) = cli.command {
            assert_eq!(args.answers, PathBuf::from("answers.yaml"));
            assert_eq!(args.out, PathBuf::from("."));
            assert_eq!(args.latency_ms, Some(0));
            assert!(args.terms);
        } else {
            panic!("expected register");
        }
    }

    #[test]
    fn cli_parse_register_requires_answers() {
        assert!(Cli::try_parse_from(["udyam", "register"]).is_err());
    }

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from(["udyam", "check", "pan", "ABCDE1234F"]).unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.kind, CheckKind::Pan);
            assert_eq!(args.value, "ABCDE1234F");
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_check_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["udyam", "check", "gstin", "x"]).is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["udyam", "schema", "--json-logs", "--metrics"]).unwrap();
        assert!(cli.json_logs);
        assert!(cli.metrics);
        assert!(matches!(cli.command, Commands::Schema(_)));
    }
}
