//! Source parsers and extension-based dispatch

pub mod python;
pub mod registry;
pub mod rust;

use crate::domain::FileAnalysis;
use crate::error::ParsingError;
use std::path::Path;
use tree_sitter::Node;

pub use python::PythonParser;
pub use registry::ParserRegistry;
pub use rust::RustParser;

/// Message recorded when tree-sitter reports a syntax error anywhere in a file.
pub const SYNTAX_ERROR: &str = "Syntax error detected by tree-sitter";

/// A parser for one family of source files.
///
/// Implementations must be shareable across the rayon pool; per-parse state
/// (such as a `tree_sitter::Parser`) is created inside `parse`.
pub trait SourceParser: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extensions this parser accepts, with or without the leading dot.
    fn supported_extensions(&self) -> &[&'static str];

    /// Parse the file at `path`.
    ///
    /// Syntax problems are reported in `FileAnalysis::errors`; an `Err` means
    /// the file could not be processed at all.
    fn parse(&self, path: &Path) -> Result<FileAnalysis, ParsingError>;
}

pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>, ParsingError> {
    std::fs::read(path).map_err(|source| ParsingError::Unreadable {
        path: path.display().to_string(),
        source,
    })
}

pub(crate) fn new_ts_parser(
    language: tree_sitter::Language,
    name: &'static str,
) -> Result<tree_sitter::Parser, ParsingError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParsingError::Grammar { language: name, message: e.to_string() })?;
    Ok(parser)
}
