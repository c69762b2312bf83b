//! repo-analyzer: extract the structure of a Git repository as JSON

use anyhow::Result;

fn main() -> Result<()> {
    repo_analyzer::cli::run()
}
