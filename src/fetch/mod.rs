//! Repository acquisition (URL validation, cloning, local paths)

pub mod context;
pub mod git;
pub mod local;
pub mod validator;

pub use context::RepoContext;
pub use git::{repo_name_from_url, sanitize_clone_error, RepoAcquirer};
pub use local::validate_local_path;
pub use validator::{display_url, validate_repo_url, Resolver, SystemResolver, UrlValidator};
