//! `redact` command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use super::utils::load_run_config;
use crate::redact::Redactor;
use crate::utils::decode_lossy;

#[derive(Args)]
pub struct RedactArgs {
    /// File to redact
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print per-rule match counts to stderr
    #[arg(long)]
    pub report: bool,

    /// Also redact long high-entropy tokens
    #[arg(long)]
    pub entropy: bool,
}

pub fn run(args: RedactArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_run_config(config_path)?;
    let bytes =
        fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    let text = decode_lossy(&bytes);

    let mut redactor = Redactor::from_config(&config.redaction);
    if args.entropy {
        redactor = redactor.with_entropy_detection(true);
    }

    let outcome = redactor.redact_report(&text);
    print!("{}", outcome.content);

    if args.report {
        eprintln!("Redactions: {}", outcome.total());
        for (rule, count) in &outcome.counts {
            eprintln!("  {rule}: {count}");
        }
    }
    Ok(())
}
