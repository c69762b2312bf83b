//! Config file discovery and loading

use crate::config::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "REPO_ANALYZER_";

const CANDIDATES: [&str; 6] = [
    "repo-analyzer.toml",
    ".repo-analyzer.toml",
    "repo-analyzer.yaml",
    ".repo-analyzer.yaml",
    "repo-analyzer.yml",
    ".repo-analyzer.yml",
];

/// Load configuration for a run started in `work_dir`.
///
/// An explicit `config_path` must exist and parse. An auto-discovered file
/// that fails to parse is skipped with a warning.
pub fn load_config(work_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    load_with_env_prefix(work_dir, config_path, ENV_PREFIX)
}

fn load_with_env_prefix(
    work_dir: &Path,
    config_path: Option<&Path>,
    env_prefix: &str,
) -> Result<Config> {
    let config = match config_path {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let file = file_provider(path)?;
            extract(file, env_prefix)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => match discover_config(work_dir) {
            Some(path) => {
                let attempt = file_provider(&path).and_then(|file| extract(file, env_prefix));
                match attempt {
                    Ok(cfg) => {
                        tracing::debug!(path = %path.display(), "Loaded config file");
                        cfg
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to parse auto-discovered config {}: {:#}",
                            path.display(),
                            e
                        );
                        extract(Figment::new(), env_prefix)?
                    }
                }
            }
            None => extract(Figment::new(), env_prefix)?,
        },
    };

    config.validate()?;
    Ok(config)
}

fn file_provider(path: &Path) -> Result<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => Ok(Figment::from(Toml::file(path))),
        "yaml" | "yml" => Ok(Figment::from(Yaml::file(path))),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            path.display()
        ),
    }
}

fn extract(file: Figment, env_prefix: &str) -> Result<Config> {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(file)
        // Nested keys use a double underscore: REPO_ANALYZER_REDACTION__ENTROPY
        .merge(Env::prefixed(env_prefix).split("__"))
        .extract()
        .map_err(anyhow::Error::from)
}

fn discover_config(work_dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|name| work_dir.join(name)).find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Nothing in the environment uses this prefix.
    const TEST_PREFIX: &str = "REPO_ANALYZER_LOADER_TEST_";

    #[test]
    fn defaults_when_no_file_exists() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_with_env_prefix(tmp.path(), None, TEST_PREFIX).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn loads_discovered_toml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("repo-analyzer.toml"),
            "max_content_bytes = 999\nparallel = false\n\n[redaction]\nentropy = true\n",
        )
        .expect("write");

        let cfg = load_with_env_prefix(tmp.path(), None, TEST_PREFIX).expect("config");
        assert_eq!(cfg.max_content_bytes, 999);
        assert!(!cfg.parallel);
        assert!(cfg.redaction.entropy);
        assert_eq!(cfg.redaction.entropy_min_length, 20);
    }

    #[test]
    fn loads_explicit_yaml() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("custom.yml");
        fs::write(&path, "redact_content: false\nclone_timeout_secs: 0\n").expect("write");

        let cfg = load_with_env_prefix(tmp.path(), Some(&path), TEST_PREFIX).expect("config");
        assert!(!cfg.redact_content);
        assert_eq!(cfg.clone_timeout(), None);
    }

    #[test]
    fn explicit_config_with_invalid_type_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "max_content_bytes = \"lots\"\n").expect("write");

        let result = load_with_env_prefix(tmp.path(), Some(&path), TEST_PREFIX);
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let result = load_with_env_prefix(tmp.path(), Some(&tmp.path().join("nope.toml")), TEST_PREFIX);
        let err = result.err().expect("error");
        assert!(err.to_string().contains("Config file not found"), "got: {err}");
    }

    #[test]
    fn explicit_config_with_unknown_extension_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.ini");
        fs::write(&path, "parallel = false\n").expect("write");
        assert!(load_with_env_prefix(tmp.path(), Some(&path), TEST_PREFIX).is_err());
    }

    #[test]
    fn auto_discovered_invalid_config_falls_back_to_defaults() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(".repo-analyzer.toml"), "parallel = [1, 2]\n").expect("write");

        let cfg = load_with_env_prefix(tmp.path(), None, TEST_PREFIX)
            .expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("zero.toml");
        fs::write(&path, "max_content_bytes = 0\n").expect("write");
        assert!(load_with_env_prefix(tmp.path(), Some(&path), TEST_PREFIX).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("repo-analyzer.toml");
        fs::write(&path, "clone_timeout_secs = 10\n").expect("write");

        let prefix = "REPO_ANALYZER_ENV_OVERRIDE_TEST_";
        std::env::set_var(format!("{prefix}CLONE_TIMEOUT_SECS"), "42");
        let cfg = load_with_env_prefix(tmp.path(), Some(&path), prefix).expect("config");
        std::env::remove_var(format!("{prefix}CLONE_TIMEOUT_SECS"));

        assert_eq!(cfg.clone_timeout_secs, 42);
    }
}
