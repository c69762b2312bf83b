//! Extension-keyed parser registry

use crate::parser::{PythonParser, RustParser, SourceParser};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_PRIORITY: i32 = 0;

struct Registration {
    priority: i32,
    parser: Arc<dyn SourceParser>,
}

/// Maps file extensions to parsers.
///
/// When several parsers claim an extension, the highest priority wins; among
/// equal priorities the one registered first keeps the extension.
#[derive(Default)]
pub struct ParserRegistry {
    by_extension: HashMap<String, Registration>,
    parsers: Vec<Arc<dyn SourceParser>>,
}

impl ParserRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in Python and Rust parsers.
    pub fn with_default_parsers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PythonParser::new()));
        registry.register(Arc::new(RustParser::new()));
        registry
    }

    pub fn register(&mut self, parser: Arc<dyn SourceParser>) {
        self.register_with_priority(parser, DEFAULT_PRIORITY);
    }

    pub fn register_with_priority(&mut self, parser: Arc<dyn SourceParser>, priority: i32) {
        for ext in parser.supported_extensions() {
            let key = normalize_extension(ext);
            match self.by_extension.get(&key) {
                Some(existing) if existing.priority >= priority => {
                    tracing::debug!(
                        extension = %key,
                        kept = existing.parser.name(),
                        ignored = parser.name(),
                        "Extension already claimed by a parser of equal or higher priority"
                    );
                }
                _ => {
                    self.by_extension
                        .insert(key, Registration { priority, parser: Arc::clone(&parser) });
                }
            }
        }
        self.parsers.push(parser);
    }

    /// Parser for `path`, chosen by its (case-insensitive) extension.
    pub fn lookup(&self, path: &Path) -> Option<Arc<dyn SourceParser>> {
        let ext = path.extension()?.to_str()?;
        self.by_extension.get(&normalize_extension(ext)).map(|r| Arc::clone(&r.parser))
    }

    /// Every registered parser, in registration order.
    pub fn parsers(&self) -> &[Arc<dyn SourceParser>] {
        &self.parsers
    }

    /// Claimed extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_ascii_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}
