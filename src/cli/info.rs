//! Info command implementation

use anyhow::Result;
use clap::Args;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::utils::load_run_config;
use crate::analysis::AnalysisOrchestrator;
use crate::domain::CodeAnalysisResult;
use crate::scan::render_tree;

#[derive(Args)]
pub struct InfoArgs {
    /// Local directory path to summarize
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// List every recorded error
    #[arg(long)]
    pub show_errors: bool,
}

pub fn run(args: InfoArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_run_config(config_path)?;
    let orchestrator = AnalysisOrchestrator::from_config(&config);
    let result = orchestrator.analyze_local_path(&args.path);
    if result.is_empty_failure() {
        let reason = result.errors.first().map(|e| e.error.as_str()).unwrap_or("unknown error");
        anyhow::bail!("{reason}");
    }

    println!("Repository: {}", result.file_tree.name());

    let langs = language_counts(&result);
    if !langs.is_empty() {
        println!("Languages detected:");
        for (lang, count) in langs {
            println!("  {}: {} files", lang, count);
        }
    }

    println!("Statistics:");
    println!("  Files analyzed: {}", result.file_analysis.len());
    println!("  Binary files: {}", result.file_analysis.values().filter(|a| a.is_binary).count());
    println!("  Errors: {}", result.errors.len());
    println!(
        "  Parsers: {}",
        orchestrator.registry().supported_extensions().join(", ")
    );

    if args.show_errors && !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!("  {}: {}", error.file_path, error.error);
        }
    }

    println!("\n{}", render_tree(&result.file_tree));
    Ok(())
}

/// Files per language, most common first, ties by name.
fn language_counts(result: &CodeAnalysisResult) -> Vec<(&str, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for analysis in result.file_analysis.values() {
        *counts.entry(analysis.language.as_str()).or_default() += 1;
    }
    let mut langs: Vec<_> = counts.into_iter().collect();
    langs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    langs
}
