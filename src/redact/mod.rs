//! Secret redaction with optional entropy detection

pub mod entropy;
pub mod redactor;
pub mod rules;

pub use redactor::{redact, RedactionOutcome, Redactor};
pub use rules::REDACTION_MARKER;
