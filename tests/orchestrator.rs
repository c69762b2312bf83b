//! End-to-end tests for the analysis orchestrator

use repo_analyzer::domain::{ExtractedElement, FunctionElement};
use repo_analyzer::error::ParsingError;
use repo_analyzer::fetch::{RepoAcquirer, Resolver, UrlValidator};
use repo_analyzer::parser::{ParserRegistry, SourceParser};
use repo_analyzer::{AnalysisError, AnalysisOrchestrator, FileAnalysis, FileTreeNode};
use std::fmt;
use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Parser that panics on every file it is handed.
struct Exploding;

impl SourceParser for Exploding {
    fn name(&self) -> &'static str {
        "exploding"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        &[".boom"]
    }

    fn parse(&self, _path: &Path) -> Result<FileAnalysis, ParsingError> {
        panic!("parser blew up");
    }
}

/// Parser that always reports a failure.
struct Failing;

impl SourceParser for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        &[".fail"]
    }

    fn parse(&self, path: &Path) -> Result<FileAnalysis, ParsingError> {
        Err(ParsingError::NoTree { path: path.display().to_string() })
    }
}

/// Error source whose message cannot be rendered.
#[derive(Debug)]
struct Unprintable;

impl fmt::Display for Unprintable {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("display exploded");
    }
}

impl std::error::Error for Unprintable {}

/// Parser whose error blows up once the orchestrator formats it.
struct BadError;

impl SourceParser for BadError {
    fn name(&self) -> &'static str {
        "bad-error"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        &[".odd"]
    }

    fn parse(&self, path: &Path) -> Result<FileAnalysis, ParsingError> {
        Err(ParsingError::Unreadable {
            path: path.display().to_string(),
            source: io::Error::new(io::ErrorKind::Other, Unprintable),
        })
    }
}

fn orchestrator() -> AnalysisOrchestrator {
    let mut registry = ParserRegistry::with_default_parsers();
    registry.register(Arc::new(Exploding));
    registry.register(Arc::new(Failing));
    registry.register(Arc::new(BadError));
    AnalysisOrchestrator::new().with_registry(registry)
}

fn child_names(node: &FileTreeNode) -> Vec<&str> {
    node.children().iter().map(FileTreeNode::name).collect()
}

#[test]
fn python_file_and_binary_blob() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("a.py"), "def hello() -> str:\n    return 'hi'\n").expect("write");
    fs::write(tmp.path().join("b.bin"), [0_u8, 1, 2, 3, 255]).expect("write");

    let result = orchestrator().analyze(tmp.path(), "demo");

    assert_eq!(result.file_analysis.len(), 2);

    let a = &result.file_analysis["a.py"];
    similar_asserts::assert_eq!(
        a.elements,
        vec![ExtractedElement::Function(FunctionElement {
            name: "hello".to_string(),
            docstring: None,
            return_type: Some("str".to_string()),
        })]
    );
    assert!(a.errors.is_empty());

    let b = &result.file_analysis["b.bin"];
    assert_eq!(b.file_type, "Binary");
    assert!(b.is_binary);
    assert!(b.content.is_none());

    let no_parser = vec![AnalysisError::new("b.bin", "No suitable parser found.")];
    assert_eq!(b.errors, no_parser);
    assert_eq!(result.errors, no_parser);

    let blob = result.file_tree.find("/b.bin").expect("tree node");
    similar_asserts::assert_eq!(
        blob,
        &FileTreeNode::File { name: "b.bin".to_string(), path: "/b.bin".to_string(), is_binary: true }
    );
}

#[test]
fn unknown_text_file_keeps_its_content() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("NOTES.txt"), "remember the milk\n").expect("write");

    let result = orchestrator().analyze(tmp.path(), "demo");
    let notes = &result.file_analysis["NOTES.txt"];
    assert_eq!(notes.file_type, "Unknown");
    assert_eq!(notes.language, "N/A");
    assert_eq!(notes.content.as_deref(), Some("remember the milk\n"));
}

#[test]
fn panicking_parser_is_contained_to_its_file() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("x.boom"), "anything").expect("write");
    fs::write(tmp.path().join("ok.py"), "def ok():\n    pass\n").expect("write");

    for parallel in [false, true] {
        let result = orchestrator().with_parallel(parallel).analyze(tmp.path(), "demo");

        assert!(!result.file_analysis.contains_key("x.boom"));
        assert!(result.file_analysis.contains_key("ok.py"));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].file_path, "x.boom");
        assert_eq!(result.errors[0].error, "Unexpected parsing error: parser blew up");
        // Still listed in the tree.
        assert!(result.file_tree.find("/x.boom").is_some());
    }
}

#[test]
fn parser_errors_are_recorded_and_the_run_continues() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("x.fail"), "anything").expect("write");
    fs::write(tmp.path().join("ok.rs"), "fn ok() {}\n").expect("write");

    let result = orchestrator().analyze(tmp.path(), "demo");
    assert!(!result.file_analysis.contains_key("x.fail"));
    assert!(result.file_analysis.contains_key("ok.rs"));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].error.starts_with("Parsing error: "), "{:?}", result.errors);
}

#[test]
fn panic_outside_the_parser_becomes_a_single_run_error() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("x.odd"), "anything").expect("write");
    fs::write(tmp.path().join("ok.py"), "def ok():\n    pass\n").expect("write");

    for parallel in [false, true] {
        let result = orchestrator().with_parallel(parallel).analyze(tmp.path(), "demo");

        assert!(result.is_empty_failure());
        assert_eq!(result.file_tree.name(), "demo");
        assert_eq!(
            result.errors,
            vec![AnalysisError::new(
                "demo",
                "An unexpected error occurred during orchestration: display exploded"
            )]
        );
    }
}

#[test]
fn excluded_directory_is_absent_from_tree_and_results() {
    let tmp = TempDir::new().expect("tmp");
    fs::create_dir(tmp.path().join("node_modules")).expect("mkdir");
    fs::write(tmp.path().join("node_modules/dep.py"), "def dep():\n    pass\n").expect("write");
    fs::write(tmp.path().join("main.py"), "def main():\n    pass\n").expect("write");

    let result = orchestrator().analyze(tmp.path(), "demo");
    assert_eq!(child_names(&result.file_tree), vec!["main.py"]);
    assert_eq!(result.file_analysis.keys().map(String::as_str).collect::<Vec<_>>(), vec!["main.py"]);
}

#[test]
fn specify_projects_skip_specs_and_history() {
    let tmp = TempDir::new().expect("tmp");
    for dir in [".specify", ".gemini", "specs", "history"] {
        fs::create_dir(tmp.path().join(dir)).expect("mkdir");
    }
    fs::write(tmp.path().join("specs/plan.py"), "x = 1\n").expect("write");
    fs::write(tmp.path().join("history/old.py"), "x = 1\n").expect("write");
    fs::write(tmp.path().join("app.py"), "x = 1\n").expect("write");

    let result = orchestrator().analyze(tmp.path(), "demo");
    assert_eq!(result.file_analysis.keys().map(String::as_str).collect::<Vec<_>>(), vec!["app.py"]);
}

#[test]
fn specs_directory_is_kept_without_both_markers() {
    let tmp = TempDir::new().expect("tmp");
    fs::create_dir(tmp.path().join(".specify")).expect("mkdir");
    fs::create_dir(tmp.path().join("specs")).expect("mkdir");
    fs::write(tmp.path().join("specs/plan.py"), "x = 1\n").expect("write");

    let result = orchestrator().analyze(tmp.path(), "demo");
    assert!(result.file_analysis.contains_key("specs/plan.py"));
}

#[cfg(unix)]
#[test]
fn symlinks_are_never_parsed() {
    use std::os::unix::fs::symlink;

    let outside = TempDir::new().expect("outside");
    fs::write(outside.path().join("secret.py"), "def leaked():\n    pass\n").expect("write");

    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("real.py"), "def real():\n    pass\n").expect("write");
    symlink(outside.path(), tmp.path().join("outside_dir")).expect("dir symlink");
    symlink(outside.path().join("secret.py"), tmp.path().join("alias.py")).expect("file symlink");

    let result = orchestrator().analyze(tmp.path(), "demo");
    assert_eq!(result.file_analysis.keys().map(String::as_str).collect::<Vec<_>>(), vec!["real.py"]);
    assert_eq!(child_names(&result.file_tree), vec!["real.py"]);
    assert!(result.errors.is_empty());
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let tmp = TempDir::new().expect("tmp");
    fs::create_dir_all(tmp.path().join("pkg/inner")).expect("mkdir");
    for i in 0..12 {
        fs::write(tmp.path().join(format!("pkg/m{i}.py")), format!("def f{i}():\n    pass\n"))
            .expect("write");
    }
    fs::write(tmp.path().join("pkg/inner/lib.rs"), "pub struct S;\nimpl S { fn go(&self) {} }\n")
        .expect("write");
    fs::write(tmp.path().join("pkg/broken.py"), "def (:\n").expect("write");

    let sequential = orchestrator().with_parallel(false).analyze(tmp.path(), "demo");
    let parallel = orchestrator().with_parallel(true).analyze(tmp.path(), "demo");
    similar_asserts::assert_eq!(sequential, parallel);
}

#[test]
fn result_round_trips_through_json() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("a.py"), "import os\n\nclass A:\n    def m(self):\n        pass\n")
        .expect("write");

    let result = orchestrator().analyze(tmp.path(), "demo");
    let json = serde_json::to_string(&result).expect("serialize");
    let back: repo_analyzer::CodeAnalysisResult = serde_json::from_str(&json).expect("deserialize");
    similar_asserts::assert_eq!(back, result);
}

/// Resolves every host to an address inside the private 10/8 range.
struct InternalResolver;

impl Resolver for InternalResolver {
    fn resolve(&self, _host: &str) -> io::Result<Vec<IpAddr>> {
        Ok(vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))])
    }
}

#[test]
fn ssrf_target_is_reported_not_cloned() {
    let tmp = TempDir::new().expect("tmp");
    let dest = tmp.path().join("clone");
    let acquirer = RepoAcquirer::new()
        .with_validator(UrlValidator::with_resolver(Arc::new(InternalResolver)));
    let url = "https://git.internal.example/team/tool.git";

    let result = orchestrator().with_acquirer(acquirer).analyze_repository(url, &dest);

    assert!(result.is_empty_failure());
    assert_eq!(result.file_tree.name(), "tool");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].file_path, url);
    assert!(result.errors[0].error.starts_with("Repository error: "), "{:?}", result.errors);
    assert!(result.errors[0].error.contains("10.0.0.7"));
    assert!(!dest.exists());
}
