//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{load_config, Config};

/// Where and how to write JSON results.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the JSON result to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

/// Load and validate configuration anchored at the current directory.
///
/// The analyzed repository is never searched for config files.
pub fn load_run_config(config_path: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config = load_config(&cwd, config_path)?;
    config.validate()?;
    Ok(config)
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    json.context("Failed to serialize result")
}

/// Print `value` as JSON, or write it to `args.output` when given.
pub fn emit_json<T: Serialize>(value: &T, args: &OutputArgs) -> Result<()> {
    let json = to_json(value, args.pretty)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
