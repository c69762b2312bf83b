//! repo-analyzer: safely acquire untrusted Git repositories and extract their
//! structure (file tree, functions, classes, dependencies) for documentation
//! generation.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod redact;
pub mod scan;
pub mod utils;

pub use analysis::AnalysisOrchestrator;
pub use domain::{AnalysisError, CodeAnalysisResult, FileAnalysis, FileTreeNode};
pub use error::{AcquisitionError, ParsingError, ValidationError};
