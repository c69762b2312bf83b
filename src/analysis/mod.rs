//! Repository analysis: walk, dispatch to parsers, aggregate

pub mod orchestrator;

pub use orchestrator::AnalysisOrchestrator;
