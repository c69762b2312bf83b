//! Per-file and per-run analysis results

use crate::domain::FileTreeNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single failure recorded during a run. Never escalates on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisError {
    pub file_path: String,
    pub error: String,
}

impl AnalysisError {
    pub fn new(file_path: impl Into<String>, error: impl Into<String>) -> Self {
        Self { file_path: file_path.into(), error: error.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodElement {
    pub name: String,
    pub docstring: Option<String>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionElement {
    pub name: String,
    pub docstring: Option<String>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassElement {
    pub name: String,
    pub docstring: Option<String>,
    pub return_type: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodElement>,
}

/// A structural element extracted from a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExtractedElement {
    Function(FunctionElement),
    Class(ClassElement),
}

impl ExtractedElement {
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::Class(c) => &c.name,
        }
    }
}

/// An external package referenced by a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub package_name: String,
    pub source_file: String,
    pub version_specifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file_path: String,
    pub file_type: String,
    pub language: String,
    #[serde(default)]
    pub elements: Vec<ExtractedElement>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub is_binary: bool,
    pub content: Option<String>,
    #[serde(default)]
    pub errors: Vec<AnalysisError>,
}

impl FileAnalysis {
    /// Empty analysis for a file of the given type and language.
    pub fn new(
        file_path: impl Into<String>,
        file_type: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            file_type: file_type.into(),
            language: language.into(),
            elements: Vec::new(),
            dependencies: Vec::new(),
            is_binary: false,
            content: None,
            errors: Vec::new(),
        }
    }

    /// Placeholder for a file no registered parser understands.
    ///
    /// Classified as `"Binary"` when no text content could be read, otherwise
    /// `"Unknown"`. Always carries one "no parser" error.
    pub fn unparsed(file_path: &str, content: Option<String>) -> Self {
        let is_binary = content.is_none();
        Self {
            file_path: file_path.to_string(),
            file_type: if is_binary { "Binary" } else { "Unknown" }.to_string(),
            language: "N/A".to_string(),
            elements: Vec::new(),
            dependencies: Vec::new(),
            is_binary,
            content,
            errors: vec![AnalysisError::new(file_path, NO_PARSER_ERROR)],
        }
    }
}

pub const NO_PARSER_ERROR: &str = "No suitable parser found.";

/// The aggregate produced by one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysisResult {
    pub file_tree: FileTreeNode,
    pub file_analysis: BTreeMap<String, FileAnalysis>,
    pub errors: Vec<AnalysisError>,
}

impl CodeAnalysisResult {
    /// A result with an empty root tree and nothing analyzed.
    pub fn empty(repo_name: &str) -> Self {
        Self {
            file_tree: FileTreeNode::root(repo_name),
            file_analysis: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// A run that failed before any file was visited.
    pub fn failed(repo_name: &str, error: AnalysisError) -> Self {
        let mut result = Self::empty(repo_name);
        result.errors.push(error);
        result
    }

    /// True when a downstream generator has nothing to work with.
    pub fn is_empty_failure(&self) -> bool {
        self.file_analysis.is_empty() && !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsed_without_content_is_binary() {
        let stub = FileAnalysis::unparsed("img/logo.bin", None);
        assert_eq!(stub.file_type, "Binary");
        assert!(stub.is_binary);
        assert_eq!(stub.errors, vec![AnalysisError::new("img/logo.bin", NO_PARSER_ERROR)]);
    }

    #[test]
    fn unparsed_with_content_is_unknown() {
        let stub = FileAnalysis::unparsed("notes.txt", Some("hello".to_string()));
        assert_eq!(stub.file_type, "Unknown");
        assert!(!stub.is_binary);
        assert_eq!(stub.language, "N/A");
    }

    #[test]
    fn elements_serialize_with_kind_tag() {
        let element = ExtractedElement::Function(FunctionElement {
            name: "main".to_string(),
            docstring: None,
            return_type: Some("int".to_string()),
        });
        let json = serde_json::to_value(&element).expect("serialize");
        assert_eq!(json["kind"], "function");
        assert_eq!(json["name"], "main");
        assert_eq!(json["return_type"], "int");
    }

    #[test]
    fn failed_result_is_empty_failure() {
        let result = CodeAnalysisResult::failed("demo", AnalysisError::new("u", "boom"));
        assert!(result.is_empty_failure());
        assert_eq!(result.file_tree.path(), "/");
    }
}
