//! File tree construction and rendering.

use crate::domain::tree::join_tree_path;
use crate::domain::FileTreeNode;
use std::collections::HashMap;

pub type NodeId = usize;

#[derive(Debug)]
enum NodeKind {
    Dir { children: Vec<NodeId> },
    File { is_binary: bool },
}

#[derive(Debug)]
struct ArenaNode {
    name: String,
    path: String,
    kind: NodeKind,
}

/// Incremental tree builder.
///
/// Nodes live in an arena and are looked up by their repository-relative
/// path (`""` is the root), so inserting below a deep directory costs one
/// hash lookup instead of a walk down the tree.
#[derive(Debug)]
pub struct FileTreeBuilder {
    nodes: Vec<ArenaNode>,
    index: HashMap<String, NodeId>,
}

impl FileTreeBuilder {
    pub fn new(root_name: &str) -> Self {
        let root = ArenaNode {
            name: root_name.to_string(),
            path: "/".to_string(),
            kind: NodeKind::Dir { children: Vec::new() },
        };
        let mut index = HashMap::new();
        index.insert(String::new(), 0);
        Self { nodes: vec![root], index }
    }

    /// Insert a directory (and any missing ancestors) at `rel_path`.
    pub fn insert_dir(&mut self, rel_path: &str) -> NodeId {
        if let Some(&id) = self.index.get(rel_path) {
            return id;
        }
        let (parent, name) = split_parent(rel_path);
        let parent_id = self.insert_dir(parent);
        self.push_child(parent_id, rel_path, name, NodeKind::Dir { children: Vec::new() })
    }

    /// Insert a file at `rel_path`, creating missing parent directories.
    pub fn insert_file(&mut self, rel_path: &str, is_binary: bool) -> NodeId {
        if let Some(&id) = self.index.get(rel_path) {
            return id;
        }
        let (parent, name) = split_parent(rel_path);
        let parent_id = self.insert_dir(parent);
        self.push_child(parent_id, rel_path, name, NodeKind::File { is_binary })
    }

    pub fn set_binary(&mut self, id: NodeId, binary: bool) {
        if let Some(ArenaNode { kind: NodeKind::File { is_binary }, .. }) = self.nodes.get_mut(id) {
            *is_binary = binary;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn into_tree(self) -> FileTreeNode {
        let mut slots: Vec<Option<ArenaNode>> = self.nodes.into_iter().map(Some).collect();
        build_node(&mut slots, 0)
    }

    fn push_child(&mut self, parent_id: NodeId, rel_path: &str, name: &str, kind: NodeKind) -> NodeId {
        let parent_path = self.nodes[parent_id].path.clone();
        let id = self.nodes.len();
        self.nodes.push(ArenaNode {
            name: name.to_string(),
            path: join_tree_path(&parent_path, name),
            kind,
        });
        if let NodeKind::Dir { children } = &mut self.nodes[parent_id].kind {
            children.push(id);
        }
        self.index.insert(rel_path.to_string(), id);
        id
    }
}

fn split_parent(rel_path: &str) -> (&str, &str) {
    rel_path.rsplit_once('/').unwrap_or(("", rel_path))
}

fn build_node(slots: &mut [Option<ArenaNode>], id: NodeId) -> FileTreeNode {
    let Some(node) = slots.get_mut(id).and_then(Option::take) else {
        return FileTreeNode::root("");
    };
    match node.kind {
        NodeKind::File { is_binary } => {
            FileTreeNode::File { name: node.name, path: node.path, is_binary }
        }
        NodeKind::Dir { children } => FileTreeNode::Dir {
            name: node.name,
            path: node.path,
            children: children.into_iter().map(|child| build_node(slots, child)).collect(),
        },
    }
}

/// Render `root` as an indented text tree in discovery order.
pub fn render_tree(root: &FileTreeNode) -> String {
    let mut lines = vec![format!("{}/", root.name())];
    render_children(root, "", &mut lines);
    lines.join("\n")
}

fn render_children(node: &FileTreeNode, prefix: &str, lines: &mut Vec<String>) {
    let children = node.children();
    let total = children.len();
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == total;
        let connector = if is_last { "└── " } else { "├── " };

        if child.is_dir() {
            lines.push(format!("{}{}{}/", prefix, connector, child.name()));
            let extension = if is_last { "    " } else { "│   " };
            render_children(child, &format!("{}{}", prefix, extension), lines);
        } else {
            lines.push(format!("{}{}{}", prefix, connector, child.name()));
        }
    }
}
