//! # Schema Subcommand
//!
//! Prints the form schema JSON, or writes it as `udyam-form-schema.json`
//! into `--out`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use udyam_core::FormSchema;

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Directory to write the schema file into. Prints to stdout if absent.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let schema = FormSchema::udyam();
    let json = schema
        .to_json_pretty()
        .context("failed to serialize form schema")?;
    match &args.out {
        Some(dir) => {
            let path = write_schema(dir, &json)?;
            println!("Schema written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(0)
}

fn write_schema(dir: &Path, json: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(FormSchema::FILE_NAME);
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
