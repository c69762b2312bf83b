//! Repository traversal: exclusions, symlink-safe walking and tree building

pub mod exclusions;
pub mod tree;
pub mod walker;

pub use exclusions::{ExclusionSet, DEFAULT_EXCLUSION_PATTERNS};
pub use tree::{render_tree, FileTreeBuilder, NodeId};
pub use walker::{RepoWalker, WalkOutcome, WalkedFile};
