//! Encoding detection and best-effort text reading.
//!
//! Reads never fail the caller: unreadable, oversized or binary files yield
//! `None`, and undecodable byte sequences are replaced rather than rejected.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::fs;
use std::path::Path;

pub const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Pick an encoding for `bytes`.
///
/// Strategy:
/// 1. BOM markers (UTF-8, UTF-16 LE/BE)
/// 2. Strict UTF-8 over the sample
/// 3. `chardetng` guess
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    if valid_utf8_prefix(sample) {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

/// A sample cut mid-character is still UTF-8 if only the tail is incomplete.
fn valid_utf8_prefix(sample: &[u8]) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && sample.len() == DEFAULT_SAMPLE_SIZE,
    }
}

/// Heuristic binary check over the first [`DEFAULT_SAMPLE_SIZE`] bytes.
///
/// A NUL byte, or fewer than 70% printable ASCII bytes, means binary. UTF-16
/// text carries NULs, so a UTF-16 BOM short-circuits to text.
pub fn is_binary_bytes(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    if sample.is_empty() {
        return false;
    }

    if let Some((encoding, _)) = Encoding::for_bom(sample) {
        if encoding != UTF_8 {
            return false;
        }
    }

    if sample.contains(&0) {
        return true;
    }

    // Multi-byte UTF-8 counts as text.
    if valid_utf8_prefix(sample) {
        return false;
    }

    let printable_count = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == b'\t' || b == b'\n' || b == b'\r')
        .count();

    (printable_count as f64 / sample.len() as f64) < 0.70
}

/// Decode `bytes` with the detected encoding, replacing invalid sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }
    let encoding = detect_encoding(bytes);
    let (decoded, _encoding_used, _had_errors) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Best-effort text content of `path`.
///
/// `None` when the file is at least `max_bytes` long, cannot be read, or
/// looks binary.
pub fn read_text_lossy(path: &Path, max_bytes: u64) -> Option<String> {
    let meta = fs::metadata(path).ok()?;
    if meta.len() >= max_bytes {
        tracing::debug!(path = %path.display(), size = meta.len(), "Skipping content of large file");
        return None;
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Failed to read file content");
            return None;
        }
    };

    if is_binary_bytes(&bytes) {
        return None;
    }
    Some(decode_lossy(&bytes))
}
