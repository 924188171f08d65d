//! Repository tree model used for the file tree, breadcrumbs and sibling lists.

use std::collections::HashSet;

/// Node in a repository tree at some revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Display name (file or directory name). Empty for the root.
    pub name: String,
    /// Full path relative to the repository root. Empty for the root.
    pub path: String,
    /// Whether this node is a directory.
    pub is_directory: bool,
    /// Child nodes (for directories).
    pub children: Vec<TreeNode>,
}

impl Default for TreeNode {
    fn default() -> Self {
        Self::directory("", "")
    }
}

impl TreeNode {
    /// Create a directory node.
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: true,
            children: Vec::new(),
        }
    }

    /// Create a file node.
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: false,
            children: Vec::new(),
        }
    }

    /// Build a tree from a flat list of file paths.
    ///
    /// Intermediate directories are created as needed; children are sorted
    /// directories first, then alphabetically.
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut root = TreeNode::default();

        for path in paths {
            let path = path.as_ref().trim_matches('/');
            if path.is_empty() {
                continue;
            }
            let parts: Vec<&str> = path.split('/').collect();
            root.insert_path(&parts, 0);
        }

        root.sort_recursive();
        root
    }

    fn insert_path(&mut self, parts: &[&str], depth: usize) {
        let Some(&name) = parts.get(depth) else {
            return;
        };
        let child_path = parts[..=depth].join("/");

        if depth + 1 == parts.len() {
            if !self.children.iter().any(|c| c.path == child_path) {
                self.children.push(TreeNode::file(name, child_path));
            }
            return;
        }

        let existing = self
            .children
            .iter_mut()
            .position(|c| c.is_directory && c.name == name);

        let idx = match existing {
            Some(idx) => idx,
            None => {
                self.children.push(TreeNode::directory(name, child_path));
                self.children.len() - 1
            }
        };
        self.children[idx].insert_path(parts, depth + 1);
    }

    /// Sort children recursively (directories first, then alphabetically).
    pub fn sort_recursive(&mut self) {
        self.children.sort_by(|a, b| match (a.is_directory, b.is_directory) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.cmp(&b.name),
        });

        for child in &mut self.children {
            child.sort_recursive();
        }
    }

    /// Find a node by its full path. The empty path returns the root.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Some(self);
        }

        let mut node = self;
        for part in path.split('/') {
            node = node.children.iter().find(|c| c.name == part)?;
        }
        Some(node)
    }

    /// Entries sharing a parent directory with `path` (including `path`).
    ///
    /// Returns an empty list when the parent directory is not in the tree.
    pub fn siblings_of(&self, path: &str) -> Vec<SiblingEntry> {
        let parent = parent_path(path);
        self.find(parent)
            .filter(|node| node.is_directory)
            .map(|node| node.children.iter().map(SiblingEntry::from).collect())
            .unwrap_or_default()
    }

    /// Flatten the tree for rendering, descending only into `expanded`
    /// directories.
    pub fn flatten(&self, expanded: &HashSet<String>) -> Vec<FlatTreeEntry> {
        let mut result = Vec::new();
        self.flatten_recursive(0, expanded, &mut result);
        result
    }

    fn flatten_recursive(
        &self,
        depth: usize,
        expanded: &HashSet<String>,
        result: &mut Vec<FlatTreeEntry>,
    ) {
        for child in &self.children {
            let is_expanded = child.is_directory && expanded.contains(&child.path);
            result.push(FlatTreeEntry {
                depth,
                name: child.name.clone(),
                path: child.path.clone(),
                is_dir: child.is_directory,
                is_expanded,
            });
            if is_expanded {
                child.flatten_recursive(depth + 1, expanded, result);
            }
        }
    }
}

/// The directory part of `path` (empty for top-level entries).
fn parent_path(path: &str) -> &str {
    let path = path.trim_matches('/');
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Breadcrumb segments for a path: `(name, path)` for every ancestor
/// directory and the entry itself.
pub fn breadcrumbs(path: &str) -> Vec<(String, String)> {
    let mut crumbs = Vec::new();
    let mut prefix = String::new();
    for part in path.trim_matches('/').split('/').filter(|p| !p.is_empty()) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(part);
        crumbs.push((part.to_string(), prefix.clone()));
    }
    crumbs
}

/// One element of the sibling projection shown next to the breadcrumbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingEntry {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
}

impl From<&TreeNode> for SiblingEntry {
    fn from(node: &TreeNode) -> Self {
        Self {
            name: node.name.clone(),
            path: node.path.clone(),
            is_directory: node.is_directory,
        }
    }
}

/// A flattened tree entry for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTreeEntry {
    /// Nesting depth (0 = top level).
    pub depth: usize,
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub is_expanded: bool,
}

impl FlatTreeEntry {
    /// Get the icon for this entry.
    pub fn icon(&self) -> &'static str {
        if self.is_dir {
            if self.is_expanded {
                "▼ "
            } else {
                "▶ "
            }
        } else {
            "  "
        }
    }

    /// Indent string based on depth.
    pub fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}
