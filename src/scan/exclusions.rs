//! Name-based exclusion patterns

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Noise skipped in every repository: VCS metadata, dependency and cache
/// directories, build output and binary-like extensions.
pub const DEFAULT_EXCLUSION_PATTERNS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".eggs",
    "*.egg-info",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".idea",
    ".vscode",
    "dist",
    "build",
    "target",
    "out",
    ".next",
    "coverage",
    ".DS_Store",
    "*.pyc",
    "*.pyo",
    "*.so",
    "*.dll",
    "*.dylib",
    "*.exe",
    "*.o",
    "*.a",
    "*.class",
    "*.jar",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.ico",
    "*.pdf",
];

/// Both marker directories present at the root mark a spec-driven project.
pub const SPEC_MARKER_DIR: &str = ".specify";
pub const TOOLING_MARKER_DIR: &str = ".gemini";

/// Extra directories skipped in spec-driven projects.
pub const SPEC_DRIVEN_EXCLUSIONS: &[&str] = &["specs", "history"];

/// Compiled glob patterns matched against single file or directory names.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    globset: GlobSet,
}

impl ExclusionSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, globset::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self { patterns, globset: builder.build()? })
    }

    pub fn defaults() -> Result<Self, globset::Error> {
        Self::new(DEFAULT_EXCLUSION_PATTERNS.iter().copied())
    }

    /// Defaults, extended for spec-driven projects rooted at `root`.
    pub fn for_root(root: &Path) -> Result<Self, globset::Error> {
        let mut patterns: Vec<&str> = DEFAULT_EXCLUSION_PATTERNS.to_vec();
        if is_spec_driven(root) {
            tracing::info!(
                "Detected spec-driven project structure ({} and {} found); excluding {:?}",
                SPEC_MARKER_DIR,
                TOOLING_MARKER_DIR,
                SPEC_DRIVEN_EXCLUSIONS
            );
            patterns.extend_from_slice(SPEC_DRIVEN_EXCLUSIONS);
        }
        Self::new(patterns)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.globset.is_match(name)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn is_spec_driven(root: &Path) -> bool {
    root.join(SPEC_MARKER_DIR).is_dir() && root.join(TOOLING_MARKER_DIR).is_dir()
}
