//! Local path validation

use crate::fetch::RepoContext;
use anyhow::{Context, Result};
use std::path::Path;

/// Resolve `path` to a canonical directory the walker can start from.
pub fn validate_local_path(path: &Path) -> Result<RepoContext> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !canonical.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }

    Ok(RepoContext::new(canonical))
}

/// Final path component, used as the tree root name for local runs.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
