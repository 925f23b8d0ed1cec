//! Project tree construction.
//!
//! Depth-first filesystem walk producing the immutable [`TreeNode`] tree.
//! Build-artifact directories are excluded, only files the parser registry
//! recognizes are admitted, and children are ordered by case-insensitive
//! basename so output is deterministic across platforms.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analyzers::ParserRegistry;
use crate::core::errors::{Error, Result};
use crate::core::TreeNode;

/// Directory basenames never traversed, compared case-insensitively
pub const EXCLUDED_DIRS: &[&str] = &[
    "bin",
    "obj",
    ".git",
    ".vs",
    "node_modules",
    "packages",
    ".idea",
    "target",
    "build",
    "dist",
];

pub struct TreeBuilder<'a> {
    registry: &'a ParserRegistry,
    excluded: Vec<String>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(registry: &'a ParserRegistry) -> Self {
        Self {
            registry,
            excluded: EXCLUDED_DIRS.iter().map(|d| d.to_lowercase()).collect(),
        }
    }

    /// Extra directory basenames to exclude, typically from configuration.
    pub fn with_extra_ignores(mut self, directories: &[String]) -> Self {
        self.excluded
            .extend(directories.iter().map(|d| d.to_lowercase()));
        self
    }

    /// Build the tree rooted at `root`. Fails only when the root does not
    /// exist; unreadable children are skipped.
    pub fn build(&self, root: &Path) -> Result<TreeNode> {
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }
        Ok(self.build_node(root, 0))
    }

    fn build_node(&self, path: &Path, depth: usize) -> TreeNode {
        if !path.is_dir() {
            return TreeNode::file(path, depth);
        }

        let mut entries: Vec<PathBuf> = match std::fs::read_dir(path) {
            Ok(read_dir) => read_dir
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .collect(),
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "skipping unreadable directory");
                Vec::new()
            }
        };
        entries.sort_by_key(|entry| basename_lower(entry));

        let children: Vec<Arc<TreeNode>> = entries
            .into_iter()
            .filter_map(|entry| {
                if entry.is_dir() {
                    if self.excluded.contains(&basename_lower(&entry)) {
                        return None;
                    }
                    Some(Arc::new(self.build_node(&entry, depth + 1)))
                } else if self.registry.recognizes(&entry) {
                    Some(Arc::new(TreeNode::file(entry, depth + 1)))
                } else {
                    None
                }
            })
            .collect();

        TreeNode::directory(path, depth, children)
    }
}

fn basename_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
