//! Repository walker
//!
//! Walks the working tree without following symbolic links, prunes excluded
//! names before descending, and records every surviving file in discovery
//! order together with its node in the file tree.

use crate::domain::AnalysisError;
use crate::scan::exclusions::ExclusionSet;
use crate::scan::tree::{FileTreeBuilder, NodeId};
use crate::utils::relative_key;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A file that survived exclusion and symlink filtering.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    pub path: PathBuf,
    /// `/`-separated path relative to the walk root.
    pub rel_path: String,
    pub node: NodeId,
}

#[derive(Debug)]
pub struct WalkOutcome {
    pub tree: FileTreeBuilder,
    pub files: Vec<WalkedFile>,
    /// Entries the walk could not read; the walk continues past them.
    pub errors: Vec<AnalysisError>,
    pub symlinks_skipped: usize,
}

pub struct RepoWalker {
    root_path: PathBuf,
    root_name: String,
    exclusions: ExclusionSet,
}

impl RepoWalker {
    pub fn new(root_path: PathBuf, root_name: &str, exclusions: ExclusionSet) -> Self {
        Self { root_path, root_name: root_name.to_string(), exclusions }
    }

    pub fn walk(&self) -> WalkOutcome {
        let mut outcome = WalkOutcome {
            tree: FileTreeBuilder::new(&self.root_name),
            files: Vec::new(),
            errors: Vec::new(),
            symlinks_skipped: 0,
        };

        let walker = WalkDir::new(&self.root_path).follow_links(false).into_iter().filter_entry(|entry| {
            // The root itself is never matched against exclusions.
            entry.depth() == 0
                || !entry.file_name().to_str().is_some_and(|name| self.exclusions.is_excluded(name))
        });

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let rel_path = err
                        .path()
                        .map(|p| relative_key(&self.root_path, p))
                        .unwrap_or_default();
                    tracing::warn!(path = %rel_path, error = %err, "Failed to read directory entry");
                    outcome.errors.push(AnalysisError::new(rel_path, format!("Walk error: {err}")));
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let rel_path = relative_key(&self.root_path, entry.path());

            if entry.path_is_symlink() {
                tracing::info!(path = %rel_path, "Skipping symbolic link");
                outcome.symlinks_skipped += 1;
                continue;
            }

            if entry.file_type().is_dir() {
                outcome.tree.insert_dir(&rel_path);
            } else if entry.file_type().is_file() {
                let node = outcome.tree.insert_file(&rel_path, false);
                outcome.files.push(WalkedFile { path: entry.into_path(), rel_path, node });
            } else {
                tracing::debug!(path = %rel_path, "Skipping special file");
            }
        }

        tracing::debug!(
            files = outcome.files.len(),
            symlinks_skipped = outcome.symlinks_skipped,
            "Walk finished"
        );
        outcome
    }
}
