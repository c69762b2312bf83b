//! Redactor implementation

use crate::config::RedactionConfig;
use crate::redact::entropy::{calculate_entropy, is_safe_value};
use crate::redact::rules::{RedactionRule, DEFAULT_RULES, REDACTION_MARKER};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

const ENTROPY_THRESHOLD: f64 = 4.5;
const ENTROPY_MIN_LEN: usize = 20;

static DEFAULT_REDACTOR: Lazy<Redactor> = Lazy::new(Redactor::new);

/// Scrub `text` with the default rule set.
pub fn redact(text: &str) -> String {
    DEFAULT_REDACTOR.redact(text)
}

#[derive(Clone)]
pub struct Redactor {
    rules: Vec<RedactionRule>,
    redact_high_entropy: bool,
    entropy_threshold: f64,
    entropy_min_len: usize,
    /// Rebuilt whenever `entropy_min_len` changes.
    entropy_token_regex: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionOutcome {
    pub content: String,
    /// Matches per rule name; rules that matched nothing are absent.
    pub counts: BTreeMap<String, usize>,
}

impl RedactionOutcome {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

fn build_entropy_regex(min_len: usize) -> Regex {
    Regex::new(&format!(r"\b[A-Za-z0-9+/=_-]{{{},}}\b", min_len.max(1)))
        .expect("valid entropy token regex")
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
            redact_high_entropy: false,
            entropy_threshold: ENTROPY_THRESHOLD,
            entropy_min_len: ENTROPY_MIN_LEN,
            entropy_token_regex: build_entropy_regex(ENTROPY_MIN_LEN),
        }
    }

    pub fn from_config(cfg: &RedactionConfig) -> Self {
        Self::new()
            .with_entropy_detection(cfg.entropy)
            .with_entropy_threshold(cfg.entropy_threshold)
            .with_entropy_min_length(cfg.entropy_min_length)
    }

    pub fn with_entropy_detection(mut self, enabled: bool) -> Self {
        self.redact_high_entropy = enabled;
        self
    }

    pub fn with_entropy_threshold(mut self, threshold: f64) -> Self {
        self.entropy_threshold = threshold;
        self
    }

    pub fn with_entropy_min_length(mut self, min_len: usize) -> Self {
        self.entropy_min_len = min_len;
        self.entropy_token_regex = build_entropy_regex(min_len);
        self
    }

    pub fn redact(&self, text: &str) -> String {
        self.redact_report(text).content
    }

    /// Redact `text` and report how often each rule fired.
    pub fn redact_report(&self, text: &str) -> RedactionOutcome {
        let mut counts = BTreeMap::new();
        if text.is_empty() {
            return RedactionOutcome { content: String::new(), counts };
        }

        let mut content = text.to_string();
        for rule in &self.rules {
            let mut replaced = 0usize;
            content = rule
                .pattern
                .replace_all(&content, |caps: &regex::Captures<'_>| {
                    replaced += 1;
                    let mut expanded = String::new();
                    caps.expand(rule.replacement, &mut expanded);
                    expanded
                })
                .into_owned();
            if replaced > 0 {
                counts.insert(rule.name.to_string(), replaced);
            }
        }

        if self.redact_high_entropy {
            let (redacted, found) = self.redact_high_entropy_tokens(&content);
            content = redacted;
            if found > 0 {
                counts.insert("entropy_detected".to_string(), found);
            }
        }

        RedactionOutcome { content, counts }
    }

    fn redact_high_entropy_tokens(&self, text: &str) -> (String, usize) {
        let mut count = 0usize;
        let output = self
            .entropy_token_regex
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let token = caps.get(0).map(|m| m.as_str()).unwrap_or("");
                if token.len() >= self.entropy_min_len
                    && !token.contains("REDACTED")
                    && !is_safe_value(token)
                    && calculate_entropy(token) >= self.entropy_threshold
                {
                    count += 1;
                    REDACTION_MARKER.to_string()
                } else {
                    token.to_string()
                }
            })
            .into_owned();
        (output, count)
    }
}
