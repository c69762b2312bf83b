//! `config` command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::Path;

use super::utils::load_run_config;
use crate::config::Config;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Yaml,
    Json,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ConfigFormat::Toml)]
    pub format: ConfigFormat,
}

/// Print the effective configuration after files and environment are merged.
pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_run_config(config_path)?;
    print!("{}", render(&config, args.format)?);
    Ok(())
}

fn render(config: &Config, format: ConfigFormat) -> Result<String> {
    let text = match format {
        ConfigFormat::Toml => toml::to_string_pretty(config).context("Failed to render TOML")?,
        ConfigFormat::Yaml => serde_yaml::to_string(config).context("Failed to render YAML")?,
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).context("Failed to render JSON")? + "\n"
        }
    };
    Ok(text)
}
