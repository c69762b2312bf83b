//! Command-line interface for repo-analyzer
//!
//! Provides `analyze`, `local`, `validate`, `redact`, `info`, `config` and
//! `completions` subcommands.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod analyze;
mod info;
mod redact;
mod show_config;
mod utils;
mod validate;

/// Extract the structure of untrusted Git repositories as JSON
#[derive(Parser)]
#[command(name = "repo-analyzer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (repo-analyzer.toml or .repo-analyzer.yaml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository URL and analyze it
    Analyze(analyze::AnalyzeArgs),

    /// Analyze a directory already on disk
    Local(analyze::LocalArgs),

    /// Check a repository URL and print its normalized form
    Validate(validate::ValidateArgs),

    /// Print a file with secrets replaced by a marker
    Redact(redact::RedactArgs),

    /// Summarize a local directory: languages, errors and file tree
    Info(info::InfoArgs),

    /// Print the effective configuration
    Config(show_config::ConfigArgs),

    /// Generate a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Analyze(args) => analyze::run_remote(args, config_path),
        Commands::Local(args) => analyze::run_local(args, config_path),
        Commands::Validate(args) => validate::run(args),
        Commands::Redact(args) => redact::run(args, config_path),
        Commands::Info(args) => info::run(args, config_path),
        Commands::Config(args) => show_config::run(args, config_path),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "repo-analyzer", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["repo-analyzer", "validate", "https://github.com/a/b", "-v"])
            .expect("parse");
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Validate(_)));
    }
}
