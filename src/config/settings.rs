//! Configuration values and their defaults

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Files larger than this are analyzed without attaching content.
pub const DEFAULT_MAX_CONTENT_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_content_bytes: u64,
    /// Parse files on the rayon pool.
    pub parallel: bool,
    /// Run attached file content through the redactor.
    pub redact_content: bool,
    /// Zero disables the clone deadline.
    pub clone_timeout_secs: u64,
    pub redaction: RedactionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            parallel: true,
            redact_content: true,
            clone_timeout_secs: DEFAULT_CLONE_TIMEOUT_SECS,
            redaction: RedactionConfig::default(),
        }
    }
}

impl Config {
    pub fn clone_timeout(&self) -> Option<Duration> {
        (self.clone_timeout_secs > 0).then(|| Duration::from_secs(self.clone_timeout_secs))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_content_bytes == 0 {
            anyhow::bail!("max_content_bytes must be greater than zero");
        }
        if !self.redaction.entropy_threshold.is_finite() || self.redaction.entropy_threshold <= 0.0 {
            anyhow::bail!(
                "redaction.entropy_threshold must be a positive number, got {}",
                self.redaction.entropy_threshold
            );
        }
        if self.redaction.entropy_min_length == 0 {
            anyhow::bail!("redaction.entropy_min_length must be greater than zero");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    /// Also redact long high-entropy tokens.
    pub entropy: bool,
    pub entropy_threshold: f64,
    pub entropy_min_length: usize,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self { entropy: false, entropy_threshold: 4.5, entropy_min_length: 20 }
    }
}
