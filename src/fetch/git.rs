//! Git repository cloning

use crate::error::AcquisitionError;
use crate::fetch::validator::UrlValidator;
use crate::fetch::RepoContext;
use git2::build::RepoBuilder;
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Replaces local filesystem paths in error text shown to callers.
pub const PATH_MARKER: &str = "<redacted-path>";

static CLONING_INTO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)cloning into\s+'[^']*'\.*\s*").expect("valid regex"));

static ABSOLUTE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(^|[\s'"(=,\[])((?:[A-Za-z]:[\\/]|\\\\|~/|/)[^\s'"),\]]*)"#)
        .expect("valid regex")
});

/// Clones validated repository URLs into isolated destinations.
#[derive(Clone, Default)]
pub struct RepoAcquirer {
    validator: UrlValidator,
    timeout: Option<Duration>,
}

impl RepoAcquirer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(mut self, validator: UrlValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Abort clones that are still transferring after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate `url` and clone it into `destination`.
    ///
    /// `destination` must not exist or be an empty directory. On failure it is
    /// returned to its previous state: removed if the clone created it,
    /// emptied otherwise.
    pub fn acquire(&self, url: &str, destination: &Path) -> Result<RepoContext, AcquisitionError> {
        let normalized = self.validator.validate(url)?;
        self.clone_validated(&normalized, destination)?;
        Ok(RepoContext::new(destination.to_path_buf()))
    }

    /// Validate `url` and clone it into a fresh temporary directory.
    ///
    /// The returned context owns the directory and deletes it when dropped.
    pub fn acquire_temp(&self, url: &str) -> Result<RepoContext, AcquisitionError> {
        let normalized = self.validator.validate(url)?;

        let temp_dir = tempfile::Builder::new()
            .prefix("repo-analyzer-")
            .tempdir()
            .map_err(|e| AcquisitionError::Io { message: sanitize_clone_error(&e.to_string()) })?;
        let destination = temp_dir.path().join(clone_dir_name(&normalized));

        // On error `temp_dir` drops here and takes any partial clone with it.
        self.clone_validated(&normalized, &destination)?;
        Ok(RepoContext::temporary(destination, temp_dir))
    }

    /// Clone an already-validated URL. Never call with unvalidated input.
    pub(crate) fn clone_validated(
        &self,
        url: &str,
        destination: &Path,
    ) -> Result<(), AcquisitionError> {
        let existed = prepare_destination(destination)?;

        tracing::info!(url, "Cloning repository");
        match clone_into(url, destination, self.timeout) {
            Ok(_) => {
                tracing::info!(url, "Successfully cloned repository");
                Ok(())
            }
            Err(err) => {
                tracing::error!(url, error = %err, "Clone failed");
                cleanup_destination(destination, existed);
                Err(err)
            }
        }
    }
}

/// Returns whether `destination` already existed (as an empty directory).
fn prepare_destination(destination: &Path) -> Result<bool, AcquisitionError> {
    match fs::symlink_metadata(destination) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AcquisitionError::Io { message: sanitize_clone_error(&e.to_string()) }),
        Ok(meta) if !meta.is_dir() => Err(AcquisitionError::DestinationNotEmpty),
        Ok(_) => {
            let mut entries = fs::read_dir(destination).map_err(|e| AcquisitionError::Io {
                message: sanitize_clone_error(&e.to_string()),
            })?;
            if entries.next().is_some() {
                Err(AcquisitionError::DestinationNotEmpty)
            } else {
                Ok(true)
            }
        }
    }
}

fn cleanup_destination(destination: &Path, existed: bool) {
    if !destination.exists() {
        return;
    }

    let outcome = if existed {
        fs::read_dir(destination).and_then(|entries| {
            for entry in entries {
                let path = entry?.path();
                if fs::symlink_metadata(&path)?.is_dir() {
                    fs::remove_dir_all(&path)?;
                } else {
                    fs::remove_file(&path)?;
                }
            }
            Ok(())
        })
    } else {
        fs::remove_dir_all(destination)
    };

    match outcome {
        Ok(()) => tracing::info!("Cleaned up partial clone directory"),
        Err(err) => tracing::warn!(error = %err, "Failed to clean up partial clone directory"),
    }
}

fn clone_into(
    url: &str,
    destination: &Path,
    timeout: Option<Duration>,
) -> Result<Repository, AcquisitionError> {
    let started = Instant::now();
    if let Some(limit) = timeout {
        apply_server_timeouts(limit);
    }
    let within_deadline = move || timeout.map_or(true, |limit| started.elapsed() < limit);

    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(move |_| within_deadline());
    callbacks.sideband_progress(move |_| within_deadline());

    // Agent-backed SSH keys only, and only once: libgit2 keeps asking while
    // the callback keeps answering.
    let attempted = Cell::new(false);
    callbacks.credentials(move |_url, username, allowed| {
        if attempted.replace(true) || !allowed.contains(CredentialType::SSH_KEY) {
            return Err(git2::Error::from_str("authentication required"));
        }
        Cred::ssh_key_from_agent(username.unwrap_or("git"))
    });

    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(callbacks);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch);

    builder.clone(url, destination).map_err(|err| match timeout {
        // Either a progress callback refused to continue or a socket timed out.
        Some(limit) if started.elapsed() >= limit => {
            AcquisitionError::TimedOut { url: url.to_string(), secs: limit.as_secs() }
        }
        _ => AcquisitionError::CloneFailed {
            url: url.to_string(),
            message: sanitize_clone_error(err.message()),
        },
    })
}

/// Bound connects and socket reads, so a server that accepts and then goes
/// silent fails the clone even though no progress callback ever fires.
///
/// The options are process-wide; the most recently configured limit applies.
fn apply_server_timeouts(limit: Duration) {
    let millis = i32::try_from(limit.as_millis()).unwrap_or(i32::MAX);
    // SAFETY: both options are plain integers that libgit2 reads when it opens
    // a socket; setting them has no other side effects.
    let outcome = unsafe {
        git2::opts::set_server_connect_timeout_in_milliseconds(millis)
            .and_then(|()| git2::opts::set_server_timeout_in_milliseconds(millis))
    };
    if let Err(err) = outcome {
        tracing::warn!(error = %err, "Failed to set git server timeouts");
    }
}

/// Strip local filesystem layout from clone error text.
///
/// Drops the `Cloning into '<dir>'...` preamble and replaces absolute paths
/// (unix, home-relative and Windows forms) with [`PATH_MARKER`]. URLs are left
/// alone since their slashes never follow a path boundary character.
pub fn sanitize_clone_error(message: &str) -> String {
    let without_preamble = CLONING_INTO.replace_all(message, "");
    let masked = ABSOLUTE_PATH.replace_all(&without_preamble, |caps: &regex::Captures<'_>| {
        format!("{}{}", &caps[1], PATH_MARKER)
    });
    masked.trim().to_string()
}

/// Repository name derived from the last URL segment, minus `.git`.
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() || name == "." {
        None
    } else {
        Some(name.to_string())
    }
}

fn clone_dir_name(url: &str) -> String {
    repo_name_from_url(url).unwrap_or_else(|| "repository".to_string())
}
