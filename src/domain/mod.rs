//! Core data types shared across the analyzer

pub mod analysis;
pub mod tree;

pub use analysis::{
    AnalysisError, ClassElement, CodeAnalysisResult, Dependency, ExtractedElement, FileAnalysis,
    FunctionElement, MethodElement,
};
pub use tree::FileTreeNode;
