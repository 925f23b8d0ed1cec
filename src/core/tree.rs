//! Immutable project tree.
//!
//! The tree is built once by the walker and never mutated. Analysis
//! enriches it by producing new nodes; unchanged substructure is shared
//! through `Arc`, so a rewrite of one file node costs only the spine from
//! that node to the root.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{FileOutcome, GodFileVerdict};

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Clone, Debug, Serialize)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub name: String,
    pub path: PathBuf,
    pub depth: usize,
    /// Ordered children; empty for file nodes
    pub children: Vec<Arc<TreeNode>>,
    /// Attached once analysis is done; file nodes only
    pub outcome: Option<Arc<FileOutcome>>,
}

impl TreeNode {
    pub fn directory(path: impl Into<PathBuf>, depth: usize, children: Vec<Arc<TreeNode>>) -> Self {
        let path = path.into();
        Self {
            kind: NodeKind::Directory,
            name: basename(&path),
            path,
            depth,
            children,
            outcome: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>, depth: usize) -> Self {
        let path = path.into();
        Self {
            kind: NodeKind::File,
            name: basename(&path),
            path,
            depth,
            children: Vec::new(),
            outcome: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// New node identical to this one but carrying the analysis outcome.
    pub fn with_outcome(&self, outcome: FileOutcome) -> Self {
        Self {
            outcome: Some(Arc::new(outcome)),
            children: self.children.clone(),
            kind: self.kind,
            name: self.name.clone(),
            path: self.path.clone(),
            depth: self.depth,
        }
    }

    /// New node identical to this one but with rewritten children.
    pub fn with_children(&self, children: Vec<Arc<TreeNode>>) -> Self {
        Self {
            children,
            kind: self.kind,
            name: self.name.clone(),
            path: self.path.clone(),
            depth: self.depth,
            outcome: self.outcome.clone(),
        }
    }

    /// God-file verdict attached during enrichment, if any.
    pub fn god_file(&self) -> Option<&GodFileVerdict> {
        self.outcome.as_deref().and_then(|o| o.god_file.as_ref())
    }

    /// Depth-first pre-order visit of the subtree.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a TreeNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    pub fn file_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |node| {
            if node.is_file() {
                count += 1;
            }
        });
        count
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
