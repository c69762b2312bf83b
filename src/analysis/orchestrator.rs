//! Analysis orchestration
//!
//! Ties acquisition, the repository walk and parser dispatch together into a
//! single [`CodeAnalysisResult`]. Nothing here returns an error to the caller:
//! every failure, down to a panicking parser, ends up in the result's
//! `errors` list.

use crate::config::Config;
use crate::domain::{AnalysisError, CodeAnalysisResult, FileAnalysis};
use crate::error::AcquisitionError;
use crate::fetch::local::dir_name;
use crate::fetch::{display_url, repo_name_from_url, validate_local_path, RepoAcquirer, RepoContext};
use crate::parser::ParserRegistry;
use crate::redact::Redactor;
use crate::scan::{ExclusionSet, RepoWalker, WalkedFile};
use crate::utils::read_text_lossy;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

/// What happened to one walked file.
enum FileOutcome {
    /// A parser result or a "no parser" stub.
    Analyzed(FileAnalysis),
    /// The parser failed; no entry is stored for the file.
    Failed(AnalysisError),
}

pub struct AnalysisOrchestrator {
    registry: ParserRegistry,
    acquirer: RepoAcquirer,
    max_content_bytes: u64,
    parallel: bool,
    redactor: Option<Redactor>,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AnalysisOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            registry: ParserRegistry::with_default_parsers(),
            acquirer: RepoAcquirer::new().with_timeout(config.clone_timeout()),
            max_content_bytes: config.max_content_bytes,
            parallel: config.parallel,
            redactor: config.redact_content.then(|| Redactor::from_config(&config.redaction)),
        }
    }

    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_acquirer(mut self, acquirer: RepoAcquirer) -> Self {
        self.acquirer = acquirer;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Attach file content verbatim instead of redacting it.
    pub fn without_redaction(mut self) -> Self {
        self.redactor = None;
        self
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Clone `url` into `destination` and analyze the checkout.
    ///
    /// The clone stays on disk afterwards.
    pub fn analyze_repository(&self, url: &str, destination: &Path) -> CodeAnalysisResult {
        tracing::info!(url = %display_url(url), "Starting analysis for repository");
        self.analyze_acquired(url, || self.acquirer.acquire(url, destination))
    }

    /// Clone `url` into a temporary directory, analyze it, and remove the clone.
    pub fn analyze_remote(&self, url: &str) -> CodeAnalysisResult {
        tracing::info!(url = %display_url(url), "Starting analysis for remote repository");
        self.analyze_acquired(url, || self.acquirer.acquire_temp(url))
    }

    /// Analyze a directory already on disk. Nothing is cloned or deleted.
    pub fn analyze_local_path(&self, path: &Path) -> CodeAnalysisResult {
        let label = path.display().to_string();
        tracing::info!(path = %label, "Starting analysis for local path");

        let ctx = match validate_local_path(path) {
            Ok(ctx) => ctx,
            Err(err) => {
                tracing::error!(path = %label, error = %err, "Local path is not analyzable");
                return CodeAnalysisResult::failed(
                    &dir_name(path),
                    AnalysisError::new(label, format!("Repository error: {err:#}")),
                );
            }
        };

        let repo_name = dir_name(ctx.working_dir());
        let result =
            self.guarded(&label, &repo_name, || self.analyze_unguarded(ctx.working_dir(), &repo_name));
        tracing::info!(path = %label, "Finished analysis for local path");
        result
    }

    /// Walk `root` and analyze every eligible file under it.
    ///
    /// `repo_name` labels the root of the file tree.
    pub fn analyze(&self, root: &Path, repo_name: &str) -> CodeAnalysisResult {
        self.guarded(repo_name, repo_name, || self.analyze_unguarded(root, repo_name))
    }

    fn analyze_unguarded(&self, root: &Path, repo_name: &str) -> CodeAnalysisResult {
        let started = Instant::now();
        let mut result = CodeAnalysisResult::empty(repo_name);

        let exclusions = match ExclusionSet::for_root(root) {
            Ok(set) => set,
            Err(err) => {
                result.errors.push(AnalysisError::new(
                    repo_name,
                    format!("An unexpected error occurred during orchestration: {err}"),
                ));
                return result;
            }
        };

        let walk = RepoWalker::new(root.to_path_buf(), repo_name, exclusions).walk();
        let mut tree = walk.tree;
        result.errors.extend(walk.errors);

        let outcomes: Vec<FileOutcome> = if self.parallel {
            walk.files.par_iter().map(|file| self.process_file(file)).collect()
        } else {
            walk.files.iter().map(|file| self.process_file(file)).collect()
        };

        for (file, outcome) in walk.files.iter().zip(outcomes) {
            match outcome {
                FileOutcome::Analyzed(analysis) => {
                    tree.set_binary(file.node, analysis.is_binary);
                    result.errors.extend(analysis.errors.iter().cloned());
                    result.file_analysis.insert(file.rel_path.clone(), analysis);
                }
                FileOutcome::Failed(error) => result.errors.push(error),
            }
        }

        result.file_tree = tree.into_tree();
        tracing::info!(
            repo = repo_name,
            files = result.file_analysis.len(),
            errors = result.errors.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis finished"
        );
        result
    }

    fn analyze_acquired<F>(&self, url: &str, acquire: F) -> CodeAnalysisResult
    where
        F: FnOnce() -> Result<RepoContext, AcquisitionError>,
    {
        // Rejected URLs may carry credentials; only the scrubbed form leaves here.
        let shown = display_url(url);
        let fallback_name = repo_name_from_url(&shown).unwrap_or_else(|| "repository".to_string());

        let ctx = match acquire() {
            Ok(ctx) => ctx,
            Err(err) => {
                tracing::error!(url = %shown, error = %err, "Repository acquisition failed");
                return CodeAnalysisResult::failed(
                    &fallback_name,
                    AnalysisError::new(&shown, format!("Repository error: {err}")),
                );
            }
        };
        tracing::info!(url = %shown, temporary = ctx.is_temp(), "Repository acquired");

        let repo_name =
            repo_name_from_url(&shown).unwrap_or_else(|| dir_name(ctx.working_dir()));
        let result =
            self.guarded(&shown, &repo_name, || self.analyze_unguarded(ctx.working_dir(), &repo_name));
        tracing::info!(url = %shown, "Finished analysis for repository");
        // `ctx` drops here; a temporary clone is removed with it.
        result
    }

    /// Run `f`, turning a panic anywhere in the walk into one top-level error.
    fn guarded<F>(&self, source: &str, repo_name: &str, f: F) -> CodeAnalysisResult
    where
        F: FnOnce() -> CodeAnalysisResult,
    {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(source, error = %message, "Analysis aborted unexpectedly");
                CodeAnalysisResult::failed(
                    repo_name,
                    AnalysisError::new(
                        source,
                        format!("An unexpected error occurred during orchestration: {message}"),
                    ),
                )
            }
        }
    }

    /// Read, parse and redact one file. Runs on worker threads.
    fn process_file(&self, file: &WalkedFile) -> FileOutcome {
        let content = read_text_lossy(&file.path, self.max_content_bytes)
            .map(|text| self.redact(&text));

        let Some(parser) = self.registry.lookup(&file.path) else {
            tracing::debug!(path = %file.rel_path, "No parser registered for file");
            return FileOutcome::Analyzed(FileAnalysis::unparsed(&file.rel_path, content));
        };

        match catch_unwind(AssertUnwindSafe(|| parser.parse(&file.path))) {
            Ok(Ok(mut analysis)) => {
                relabel(&mut analysis, &file.rel_path);
                analysis.content = content;
                FileOutcome::Analyzed(analysis)
            }
            Ok(Err(err)) => {
                tracing::warn!(path = %file.rel_path, parser = parser.name(), error = %err, "Parsing failed");
                FileOutcome::Failed(AnalysisError::new(&file.rel_path, format!("Parsing error: {err}")))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(path = %file.rel_path, parser = parser.name(), error = %message, "Parser panicked");
                FileOutcome::Failed(AnalysisError::new(
                    &file.rel_path,
                    format!("Unexpected parsing error: {message}"),
                ))
            }
        }
    }

    fn redact(&self, text: &str) -> String {
        match &self.redactor {
            Some(redactor) => redactor.redact(text),
            None => text.to_string(),
        }
    }
}

/// Parsers label results with the path they were handed; results are keyed by
/// the walk-relative path instead.
fn relabel(analysis: &mut FileAnalysis, rel_path: &str) {
    analysis.file_path = rel_path.to_string();
    for error in &mut analysis.errors {
        error.file_path = rel_path.to_string();
    }
    for dependency in &mut analysis.dependencies {
        dependency.source_file = rel_path.to_string();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
