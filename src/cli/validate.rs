//! `validate` command implementation

use anyhow::Result;
use clap::Args;

use crate::fetch::validate_repo_url;

#[derive(Args)]
pub struct ValidateArgs {
    /// Repository URL to check
    #[arg(value_name = "URL")]
    pub url: String,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let normalized = validate_repo_url(&args.url)?;
    println!("{normalized}");
    Ok(())
}
