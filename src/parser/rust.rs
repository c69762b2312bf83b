//! Rust parser built on tree-sitter

use crate::domain::{
    AnalysisError, ClassElement, Dependency, ExtractedElement, FileAnalysis, FunctionElement,
    MethodElement,
};
use crate::error::ParsingError;
use crate::parser::{new_ts_parser, node_text, read_source, SourceParser, SYNTAX_ERROR};
use std::path::Path;
use tree_sitter::Node;

const RUST_EXTENSIONS: &[&str] = &[".rs"];

/// Path roots that never name an external crate.
const LOCAL_ROOTS: &[&str] = &["crate", "self", "super", "std", "core", "alloc"];

/// Extracts free functions, type definitions with their methods, and crate
/// dependencies from `use` / `extern crate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustParser;

impl RustParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_source(&self, file_path: &str, source: &[u8]) -> Result<FileAnalysis, ParsingError> {
        let mut parser = new_ts_parser(tree_sitter_rust::LANGUAGE.into(), "rust")?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParsingError::NoTree { path: file_path.to_string() })?;
        let root = tree.root_node();

        let mut analysis = FileAnalysis::new(file_path, "Rust", "Rust");

        if root.has_error() {
            tracing::warn!(path = file_path, "File has syntax errors");
            analysis.errors.push(AnalysisError::new(file_path, SYNTAX_ERROR));
            return Ok(analysis);
        }

        let mut impls = Vec::new();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "function_item" => {
                    if let Some(f) = function(node, source) {
                        analysis.elements.push(ExtractedElement::Function(f));
                    }
                }
                "struct_item" | "enum_item" | "union_item" | "type_item" => {
                    if let Some(class) = type_definition(node, source, Vec::new()) {
                        analysis.elements.push(ExtractedElement::Class(class));
                    }
                }
                "trait_item" => {
                    let methods = node
                        .child_by_field_name("body")
                        .map(|body| member_functions(body, source))
                        .unwrap_or_default();
                    if let Some(class) = type_definition(node, source, methods) {
                        analysis.elements.push(ExtractedElement::Class(class));
                    }
                }
                "impl_item" => impls.push(node),
                "use_declaration" => {
                    if let Some(arg) = node.child_by_field_name("argument") {
                        add_dependency(use_root(node_text(arg, source)), file_path, &mut analysis);
                    }
                }
                "extern_crate_declaration" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        add_dependency(node_text(name, source), file_path, &mut analysis);
                    }
                }
                _ => {}
            }
        }

        // Impl blocks may precede the type they extend, so attach them last.
        for node in impls {
            attach_impl(node, source, &mut analysis.elements);
        }

        Ok(analysis)
    }
}

impl SourceParser for RustParser {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        RUST_EXTENSIONS
    }

    fn parse(&self, path: &Path) -> Result<FileAnalysis, ParsingError> {
        tracing::debug!(path = %path.display(), "Parsing Rust file");
        let source = read_source(path)?;
        self.parse_source(&path.display().to_string(), &source)
    }
}

fn function(node: Node<'_>, source: &[u8]) -> Option<FunctionElement> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    if name.is_empty() {
        return None;
    }
    Some(FunctionElement {
        name,
        docstring: doc_comment(node, source),
        return_type: node
            .child_by_field_name("return_type")
            .map(|n| node_text(n, source).to_string()),
    })
}

fn type_definition(node: Node<'_>, source: &[u8], methods: Vec<MethodElement>) -> Option<ClassElement> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    if name.is_empty() {
        return None;
    }
    Some(ClassElement { name, docstring: doc_comment(node, source), return_type: None, methods })
}

/// Functions and signatures declared directly inside an impl or trait body.
fn member_functions(body: Node<'_>, source: &[u8]) -> Vec<MethodElement> {
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|n| matches!(n.kind(), "function_item" | "function_signature_item"))
        .filter_map(|n| function(n, source))
        .map(|f| MethodElement { name: f.name, docstring: f.docstring, return_type: f.return_type })
        .collect()
}

fn attach_impl(node: Node<'_>, source: &[u8], elements: &mut Vec<ExtractedElement>) {
    let Some(type_node) = node.child_by_field_name("type") else {
        return;
    };
    let type_name = base_type_name(node_text(type_node, source));
    if type_name.is_empty() {
        return;
    }
    let impl_methods = node
        .child_by_field_name("body")
        .map(|body| member_functions(body, source))
        .unwrap_or_default();

    let position = elements
        .iter()
        .position(|e| matches!(e, ExtractedElement::Class(c) if c.name == type_name));
    if let Some(i) = position {
        if let ExtractedElement::Class(class) = &mut elements[i] {
            class.methods.extend(impl_methods);
        }
        return;
    }
    elements.push(ExtractedElement::Class(ClassElement {
        name: type_name.to_string(),
        docstring: None,
        return_type: None,
        methods: impl_methods,
    }));
}

/// `Wrapper<T>` and `crate::x::Wrapper` both name `Wrapper`.
fn base_type_name(text: &str) -> &str {
    let without_generics = text.split('<').next().unwrap_or(text);
    without_generics.rsplit("::").next().unwrap_or(without_generics).trim()
}

/// Outer `///` comments directly above `node`, skipping attributes.
fn doc_comment(node: Node<'_>, source: &[u8]) -> Option<String> {
    let mut lines = Vec::new();
    let mut sibling = node.prev_sibling();
    while let Some(prev) = sibling {
        match prev.kind() {
            "attribute_item" => {}
            "line_comment" => {
                let text = node_text(prev, source).trim_end();
                match text.strip_prefix("///") {
                    Some(rest) if !rest.starts_with('/') => {
                        lines.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
                    }
                    _ => break,
                }
            }
            _ => break,
        }
        sibling = prev.prev_sibling();
    }

    if lines.is_empty() {
        return None;
    }
    lines.reverse();
    Some(lines.join("\n"))
}

/// First path segment of a `use` argument (`serde::{Deserialize}` is `serde`).
fn use_root(argument: &str) -> &str {
    let trimmed = argument.trim().trim_start_matches("::");
    let end = trimmed.find(|c: char| c == ':' || c == '{' || c == ' ' || c == ';').unwrap_or(trimmed.len());
    &trimmed[..end]
}

fn add_dependency(package: &str, file_path: &str, analysis: &mut FileAnalysis) {
    let package = package.trim();
    if package.is_empty()
        || package == "*"
        || LOCAL_ROOTS.contains(&package)
        || analysis.dependencies.iter().any(|d| d.package_name == package)
    {
        return;
    }
    analysis.dependencies.push(Dependency {
        package_name: package.to_string(),
        source_file: file_path.to_string(),
        version_specifier: None,
    });
}
