//! Entropy calculation for secret detection

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Shapes that look random but are not secrets: UUIDs, hex digests, semver.
static SAFE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("valid regex"),
        // git SHA-1, MD5, SHA-256
        Regex::new(r"^(?:[0-9a-f]{32}|[0-9a-f]{40}|[0-9a-f]{64})$").expect("valid regex"),
        Regex::new(r"^\d+\.\d+\.\d+[\w\-+.]*$").expect("valid regex"),
    ]
});

/// Shannon entropy in bits per character.
pub fn calculate_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for ch in s.chars() {
        *counts.entry(ch).or_insert(0) += 1;
    }

    let len = s.chars().count() as f64;
    counts
        .values()
        .map(|count| {
            let p = *count as f64 / len;
            -(p * p.log2())
        })
        .sum()
}

/// Returns true if `s` matches a known safe shape.
pub fn is_safe_value(s: &str) -> bool {
    SAFE_PATTERNS.iter().any(|re| re.is_match(s))
}

#[cfg(test)]
mod tests {
    use super::{calculate_entropy, is_safe_value};

    #[test]
    fn entropy_is_zero_for_repeated_chars() {
        assert_eq!(calculate_entropy("aaaaaa"), 0.0);
    }

    #[test]
    fn entropy_higher_for_mixed_string() {
        assert!(calculate_entropy("a1b2c3d4") > calculate_entropy("aaaaaaaa"));
    }

    #[test]
    fn entropy_of_empty_string_is_zero() {
        assert_eq!(calculate_entropy(""), 0.0);
    }

    #[test]
    fn digests_and_versions_are_safe() {
        assert!(is_safe_value("a3f5e2d1c0b9e8a7f6d5c4b3a2f1e0d9c8b7a6f5"));
        assert!(is_safe_value("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_safe_value("d41d8cd98f00b204e9800998ecf8427e"));
        assert!(is_safe_value("1.2.3-beta.4"));
        assert!(!is_safe_value("Zx9qL2mN8vB4tR7yK1wP5sD3"));
    }
}
