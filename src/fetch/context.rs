//! Repository context management

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A repository checked out on local disk and ready to walk.
#[derive(Debug)]
pub struct RepoContext {
    root_path: PathBuf,
    temp_dir: Option<TempDir>,
}

impl RepoContext {
    /// A directory the caller owns; never deleted by this context.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path, temp_dir: None }
    }

    /// A clone living inside `temp_dir`, removed when the context drops.
    pub fn temporary(root_path: PathBuf, temp_dir: TempDir) -> Self {
        Self { root_path, temp_dir: Some(temp_dir) }
    }

    pub fn working_dir(&self) -> &Path {
        &self.root_path
    }

    pub fn is_temp(&self) -> bool {
        self.temp_dir.is_some()
    }
}

impl Drop for RepoContext {
    fn drop(&mut self) {
        if let Some(temp_dir) = self.temp_dir.take() {
            if let Err(err) = temp_dir.close() {
                tracing::warn!(error = %err, "Failed to remove temporary clone directory");
            } else {
                tracing::debug!("Removed temporary clone directory");
            }
        }
    }
}
