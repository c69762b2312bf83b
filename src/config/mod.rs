//! Configuration loading
//!
//! Precedence is environment > config file > defaults. Only the invoking
//! working directory (or an explicit path) is searched for a config file.

pub mod loader;
pub mod settings;

pub use loader::load_config;
pub use settings::{Config, RedactionConfig};
