//! Hierarchical file tree

use serde::{Deserialize, Serialize};

/// A node of the repository file tree.
///
/// Paths are rooted at `/`; a node's path is its parent's path joined with its
/// own name. Children keep the order in which the walk discovered them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileTreeNode {
    Dir { name: String, path: String, children: Vec<FileTreeNode> },
    File { name: String, path: String, is_binary: bool },
}

impl FileTreeNode {
    pub fn root(name: &str) -> Self {
        Self::Dir { name: name.to_string(), path: "/".to_string(), children: Vec::new() }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Dir { name, .. } | Self::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Dir { path, .. } | Self::File { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Dir { .. })
    }

    pub fn children(&self) -> &[FileTreeNode] {
        match self {
            Self::Dir { children, .. } => children,
            Self::File { .. } => &[],
        }
    }

    /// Find a descendant by its rooted path (e.g. `/src/main.py`).
    pub fn find(&self, path: &str) -> Option<&FileTreeNode> {
        if self.path() == path {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(path))
    }

    /// Count file nodes in this subtree.
    pub fn file_count(&self) -> usize {
        match self {
            Self::File { .. } => 1,
            Self::Dir { children, .. } => children.iter().map(FileTreeNode::file_count).sum(),
        }
    }
}

/// Join a parent tree path with a child name, keeping `/` as the root sentinel.
pub fn join_tree_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}
