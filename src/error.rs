//! Error kinds surfaced by the library

use thiserror::Error;

/// A repository URL failed one of the security or format checks.
///
/// Every variant renders a distinct reason; all of them mean "fix the input".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid repository URL: length {len} exceeds the maximum of {max} characters")]
    TooLong { len: usize, max: usize },

    #[error("Invalid repository URL protocol: only http://, https://, ssh:// and git@ URLs are allowed")]
    UnsupportedScheme,

    #[error("Invalid repository URL: potential command injection detected")]
    CommandInjection,

    #[error("Invalid repository URL: contains control characters")]
    ControlCharacters,

    #[error("Invalid repository URL: contains illegal characters ({found:?})")]
    IllegalCharacters { found: char },

    #[error("Invalid repository URL: path traversal segments are not allowed")]
    PathTraversal,

    #[error("Invalid repository URL: Embedded credentials are not allowed")]
    EmbeddedCredentials,

    #[error("Invalid repository URL: could not determine host")]
    MissingHost,

    #[error("Invalid repository URL: Blocked access to non-public address {addr} (host {host})")]
    BlockedAddress { host: String, addr: std::net::IpAddr },
}

/// Cloning a repository failed. Messages never contain local filesystem paths.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    InvalidUrl(#[from] ValidationError),

    #[error("Destination directory already exists and is not empty")]
    DestinationNotEmpty,

    #[error("Failed to clone repository {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Cloning {url} timed out after {secs}s")]
    TimedOut { url: String, secs: u64 },

    #[error("Failed to prepare clone destination: {message}")]
    Io { message: String },
}

/// A single file could not be parsed.
#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("Could not read file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load {language} grammar: {message}")]
    Grammar { language: &'static str, message: String },

    #[error("Parser produced no syntax tree for {path}")]
    NoTree { path: String },
}
