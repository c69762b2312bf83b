//! Shared helpers

pub mod encoding;
pub mod paths;

pub use encoding::{decode_lossy, is_binary_bytes, read_text_lossy};
pub use paths::{normalize_path, relative_key};
