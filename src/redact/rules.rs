//! Redaction rules
//!
//! Vendor-specific shapes come first, the generic `key = value` assignment
//! last, so a token inside an assignment is counted under its vendor rule.
//! Every replacement is [`REDACTION_MARKER`], and no rule can match the marker
//! itself. Open-ended token rules run to the end of the token, and fixed-length
//! ones need a trailing `\b`: a match that stopped mid-word would leave a tail
//! starting on a fresh word boundary after the marker, which a second pass
//! could match.

use once_cell::sync::Lazy;
use regex::Regex;

/// The fixed token that replaces secret material.
pub const REDACTION_MARKER: &str = "[REDACTED_SECRET]";

#[derive(Clone)]
pub struct RedactionRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

pub static DEFAULT_RULES: Lazy<Vec<RedactionRule>> = Lazy::new(|| {
    vec![
        // ── PEM blocks ───────────────────────────────────────────────────────────
        RedactionRule {
            name: "private_key_block",
            pattern: Regex::new(
                r"(?s)-----BEGIN [A-Z ]*PRIVATE KEY-----.*?-----END [A-Z ]*PRIVATE KEY-----",
            )
            .expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        RedactionRule {
            name: "certificate_block",
            pattern: Regex::new(r"(?s)-----BEGIN [A-Z ]*CERTIFICATE-----.*?-----END [A-Z ]*CERTIFICATE-----")
                .expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        // ── AWS ──────────────────────────────────────────────────────────────────
        RedactionRule {
            name: "aws_access_key",
            pattern: Regex::new(r"\b(?:AKIA|ASIA|AGPA|AIDA|AROA|ANPA)[0-9A-Z]{16}\b")
                .expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        RedactionRule {
            name: "aws_secret_key",
            pattern: Regex::new(
                "(?i)(aws[_\\-]?secret[_\\-]?(?:access[_\\-]?)?key['\"]?\\s*[:=]\\s*['\"]?)[A-Za-z0-9/+=]{40}\\b",
            )
            .expect("valid regex"),
            replacement: "${1}[REDACTED_SECRET]",
        },
        // ── Google ───────────────────────────────────────────────────────────────
        RedactionRule {
            name: "google_api_key",
            pattern: Regex::new(r"\bAIza[0-9A-Za-z\-_]{35,}").expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        // ── Stripe ───────────────────────────────────────────────────────────────
        RedactionRule {
            name: "stripe_key",
            pattern: Regex::new(r"\b[rs]k_live_[0-9A-Za-z]{24,}").expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        // ── Slack ────────────────────────────────────────────────────────────────
        RedactionRule {
            name: "slack_token",
            pattern: Regex::new(r"\bxox[baprs]-[0-9A-Za-z\-]{10,}").expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        // ── GitHub / GitLab ──────────────────────────────────────────────────────
        RedactionRule {
            name: "github_token",
            pattern: Regex::new(r"\bgh[pousr]_[A-Za-z0-9]{36,}").expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        RedactionRule {
            name: "gitlab_token",
            pattern: Regex::new(r"\bglpat-[A-Za-z0-9\-_]{20,}").expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        // ── npm ──────────────────────────────────────────────────────────────────
        RedactionRule {
            name: "npm_token",
            pattern: Regex::new(r"\bnpm_[A-Za-z0-9]{36}\b").expect("valid regex"),
            replacement: REDACTION_MARKER,
        },
        // ── Generic secret assignments ────────────────────────────────────────────
        // Only the value is replaced; key, separator and quotes stay in place.
        RedactionRule {
            name: "generic_secret",
            pattern: Regex::new(
                "(?i)((?:api[_\\-]?key|auth[_\\-]?token|access[_\\-]?token|secret[_\\-]?key|client[_\\-]?secret|password|passwd|pwd|credentials?)['\"]?\\s*[:=]\\s*['\"]?)[A-Za-z0-9_\\-./+=]{8,}",
            )
            .expect("valid regex"),
            replacement: "${1}[REDACTED_SECRET]",
        },
    ]
});
