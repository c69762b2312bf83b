//! Python parser built on tree-sitter

use crate::domain::{
    AnalysisError, ClassElement, Dependency, ExtractedElement, FileAnalysis, FunctionElement,
    MethodElement,
};
use crate::error::ParsingError;
use crate::parser::{new_ts_parser, node_text, read_source, SourceParser, SYNTAX_ERROR};
use std::path::Path;
use tree_sitter::Node;

const PYTHON_EXTENSIONS: &[&str] = &[".py", ".pyw"];

/// Extracts top-level functions, classes (with methods) and imports.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }

    /// Analyze in-memory Python source; `file_path` is only used for labels.
    pub fn parse_source(&self, file_path: &str, source: &[u8]) -> Result<FileAnalysis, ParsingError> {
        let mut parser = new_ts_parser(tree_sitter_python::LANGUAGE.into(), "python")?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParsingError::NoTree { path: file_path.to_string() })?;
        let root = tree.root_node();

        let mut analysis = FileAnalysis::new(file_path, "Python", "Python");

        if root.has_error() {
            tracing::warn!(path = file_path, "File has syntax errors");
            analysis.errors.push(AnalysisError::new(file_path, SYNTAX_ERROR));
            return Ok(analysis);
        }

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "import_statement" | "import_from_statement" => {
                    collect_imports(node, source, file_path, &mut analysis.dependencies);
                }
                _ => {
                    if let Some(element) = extract_definition(node, source) {
                        tracing::debug!(path = file_path, name = element.name(), "Extracted element");
                        analysis.elements.push(element);
                    }
                }
            }
        }

        Ok(analysis)
    }
}

impl SourceParser for PythonParser {
    fn name(&self) -> &'static str {
        "python"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        PYTHON_EXTENSIONS
    }

    fn parse(&self, path: &Path) -> Result<FileAnalysis, ParsingError> {
        tracing::debug!(path = %path.display(), "Parsing Python file");
        let source = read_source(path)?;
        self.parse_source(&path.display().to_string(), &source)
    }
}

/// Unwraps `decorated_definition` to the function or class it decorates.
fn definition_node(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

fn extract_definition(node: Node<'_>, source: &[u8]) -> Option<ExtractedElement> {
    let node = definition_node(node);
    match node.kind() {
        "function_definition" => {
            let (name, docstring, return_type) = function_parts(node, source)?;
            Some(ExtractedElement::Function(FunctionElement { name, docstring, return_type }))
        }
        "class_definition" => extract_class(node, source).map(ExtractedElement::Class),
        _ => None,
    }
}

fn function_parts(
    node: Node<'_>,
    source: &[u8],
) -> Option<(String, Option<String>, Option<String>)> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    if name.is_empty() {
        return None;
    }
    let docstring = node.child_by_field_name("body").and_then(|body| docstring(body, source));
    let return_type =
        node.child_by_field_name("return_type").map(|n| node_text(n, source).to_string());
    Some((name, docstring, return_type))
}

fn extract_class(node: Node<'_>, source: &[u8]) -> Option<ClassElement> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();
    if name.is_empty() {
        return None;
    }
    let body = node.child_by_field_name("body");
    let docstring = body.and_then(|b| docstring(b, source));

    let mut methods = Vec::new();
    if let Some(body) = body {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            let child = definition_node(child);
            if child.kind() != "function_definition" {
                continue;
            }
            if let Some((name, docstring, return_type)) = function_parts(child, source) {
                methods.push(MethodElement { name, docstring, return_type });
            }
        }
    }

    Some(ClassElement { name, docstring, return_type: None, methods })
}

/// First statement of `body` when it is a bare string literal, unquoted.
fn docstring(body: Node<'_>, source: &[u8]) -> Option<String> {
    let first = body.named_child(0)?;
    let string_node = match first.kind() {
        "expression_statement" => first.named_child(0).filter(|n| n.kind() == "string")?,
        "string" => first,
        _ => return None,
    };
    Some(unquote(node_text(string_node, source)).to_string())
}

fn unquote(raw: &str) -> &str {
    let body = raw.trim_start_matches(|c: char| matches!(c, 'r' | 'R' | 'u' | 'U' | 'b' | 'B' | 'f' | 'F'));
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return &body[quote.len()..body.len() - quote.len()];
        }
    }
    body
}

/// Record the top-level package of every absolute import.
fn collect_imports(node: Node<'_>, source: &[u8], file_path: &str, deps: &mut Vec<Dependency>) {
    let mut modules = Vec::new();
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for name in node.children_by_field_name("name", &mut cursor) {
                let dotted = if name.kind() == "aliased_import" {
                    name.child_by_field_name("name").unwrap_or(name)
                } else {
                    name
                };
                modules.push(node_text(dotted, source));
            }
        }
        "import_from_statement" => {
            if let Some(module) = node.child_by_field_name("module_name") {
                // `from . import x` and `from .pkg import y` stay inside the project.
                if module.kind() != "relative_import" {
                    modules.push(node_text(module, source));
                }
            }
        }
        _ => {}
    }

    for module in modules {
        let package = module.split('.').next().unwrap_or("").trim();
        if package.is_empty() || deps.iter().any(|d| d.package_name == package) {
            continue;
        }
        deps.push(Dependency {
            package_name: package.to_string(),
            source_file: file_path.to_string(),
            version_specifier: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(source: &str) -> FileAnalysis {
        PythonParser::new().parse_source("test.py", source.as_bytes()).expect("parse")
    }

    #[test]
    fn extracts_function_with_docstring_and_return_type() {
        let analysis = parse("def greet(name: str) -> str:\n    \"\"\"Say hello.\"\"\"\n    return f\"hi {name}\"\n");
        assert!(analysis.errors.is_empty());
        assert_eq!(
            analysis.elements,
            vec![ExtractedElement::Function(FunctionElement {
                name: "greet".to_string(),
                docstring: Some("Say hello.".to_string()),
                return_type: Some("str".to_string()),
            })]
        );
    }

    #[test]
    fn extracts_class_with_methods() {
        let source = r#"
class Greeter:
    '''Greets people.'''

    def __init__(self):
        self.count = 0

    @property
    def total(self) -> int:
        "How many greetings."
        return self.count
"#;
        let analysis = parse(source);
        let ExtractedElement::Class(class) = &analysis.elements[0] else {
            panic!("expected class, got: {:?}", analysis.elements);
        };
        assert_eq!(class.name, "Greeter");
        assert_eq!(class.docstring.as_deref(), Some("Greets people."));
        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["__init__", "total"]);
        assert_eq!(class.methods[1].return_type.as_deref(), Some("int"));
        assert_eq!(class.methods[1].docstring.as_deref(), Some("How many greetings."));
    }

    #[test]
    fn decorated_top_level_definitions_are_extracted() {
        let analysis = parse("@app.route('/')\ndef index():\n    return 'ok'\n");
        assert_eq!(analysis.elements.len(), 1);
        assert_eq!(analysis.elements[0].name(), "index");
    }

    #[test]
    fn nested_functions_are_not_top_level_elements() {
        let analysis = parse("def outer():\n    def inner():\n        pass\n    return inner\n");
        let names: Vec<&str> = analysis.elements.iter().map(ExtractedElement::name).collect();
        assert_eq!(names, vec!["outer"]);
    }

    #[test]
    fn imports_become_dependencies() {
        let source = "import os\nimport numpy as np\nimport xml.etree.ElementTree\nfrom requests import get\nfrom . import sibling\nfrom .pkg import thing\nimport os.path\n";
        let analysis = parse(source);
        let names: Vec<&str> = analysis.dependencies.iter().map(|d| d.package_name.as_str()).collect();
        assert_eq!(names, vec!["os", "numpy", "xml", "requests"]);
        assert!(analysis.dependencies.iter().all(|d| d.source_file == "test.py"));
    }

    #[test]
    fn syntax_errors_are_reported_without_elements() {
        let analysis = parse("def broken(:\n    pass\n");
        assert!(analysis.elements.is_empty());
        assert_eq!(analysis.errors, vec![AnalysisError::new("test.py", SYNTAX_ERROR)]);
    }

    #[test]
    fn unreadable_file_is_a_parsing_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = PythonParser::new().parse(&tmp.path().join("missing.py")).err().expect("error");
        assert!(matches!(err, ParsingError::Unreadable { .. }), "got: {err}");
    }

    #[test]
    fn parses_files_from_disk() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("a.py");
        fs::write(&path, "def main():\n    pass\n").expect("write");
        let analysis = PythonParser::new().parse(&path).expect("parse");
        assert_eq!(analysis.file_type, "Python");
        assert_eq!(analysis.elements.len(), 1);
    }

    #[test]
    fn unquote_handles_prefixes_and_quote_styles() {
        assert_eq!(unquote("\"\"\"doc\"\"\""), "doc");
        assert_eq!(unquote("r'''raw'''"), "raw");
        assert_eq!(unquote("'x'"), "x");
    }
}
