//! `analyze` and `local` command implementations

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use super::utils::{emit_json, load_run_config, OutputArgs};
use crate::analysis::AnalysisOrchestrator;
use crate::domain::CodeAnalysisResult;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Repository URL (https://, ssh:// or git@host:path)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Clone into this directory and keep it, instead of a temporary one
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct LocalArgs {
    /// Local directory path to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run_remote(args: AnalyzeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_run_config(config_path)?;
    let orchestrator = AnalysisOrchestrator::from_config(&config);

    let result = match &args.dest {
        Some(dest) => orchestrator.analyze_repository(&args.url, dest),
        None => orchestrator.analyze_remote(&args.url),
    };
    finish(&result, &args.output)
}

pub fn run_local(args: LocalArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_run_config(config_path)?;
    let result = AnalysisOrchestrator::from_config(&config).analyze_local_path(&args.path);
    finish(&result, &args.output)
}

/// Emit the result; a run that produced nothing but errors exits non-zero.
fn finish(result: &CodeAnalysisResult, output: &OutputArgs) -> Result<()> {
    emit_json(result, output)?;
    if result.is_empty_failure() {
        let reason = result.errors.first().map(|e| e.error.as_str()).unwrap_or("unknown error");
        anyhow::bail!("Analysis produced no results: {reason}");
    }
    if !result.errors.is_empty() {
        tracing::warn!(errors = result.errors.len(), "Analysis finished with errors");
    }
    Ok(())
}
