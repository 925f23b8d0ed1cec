//! Structural metrics extracted from parsed source files

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Per-method structural facts.
///
/// `tokens` is the lowercased token bag used as the textual feature in
/// clustering: camel/Pascal-split fragments of the method name, each
/// parameter's declared type, and each call-site target, with fragments of
/// length <= 2 dropped and duplicates collapsed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MethodMetrics {
    pub name: String,
    /// Non-blank, non-comment lines spanned by the method
    pub line_count: usize,
    /// McCabe cyclomatic complexity
    pub cyclomatic: u32,
    /// Declared formal parameter names, in order (receiver excluded)
    pub parameters: Vec<String>,
    pub return_type: String,
    pub is_public: bool,
    pub is_static: bool,
    pub is_async: bool,
    /// Textual invocation targets, deduplicated
    pub called_methods: BTreeSet<String>,
    /// Every identifier referenced in the body, deduplicated
    pub accessed_identifiers: BTreeSet<String>,
    pub tokens: Vec<String>,
}

impl MethodMetrics {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line_count: 0,
            cyclomatic: 1,
            parameters: Vec::new(),
            return_type: String::new(),
            is_public: false,
            is_static: false,
            is_async: false,
            called_methods: BTreeSet::new(),
            accessed_identifiers: BTreeSet::new(),
            tokens: Vec::new(),
        }
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }
}

/// Per-class structural facts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassMetrics {
    pub name: String,
    pub fully_qualified_name: String,
    pub file_path: PathBuf,
    /// Non-blank, non-comment lines of the class body
    pub line_count: usize,
    pub method_count: usize,
    pub property_count: usize,
    pub field_count: usize,
    /// Sum of the methods' cyclomatic complexities
    pub cyclomatic: u32,
    pub methods: Vec<MethodMetrics>,
    /// Import directives plus the first capitalized identifier references.
    /// Heuristic metadata, not a call graph.
    pub dependencies: Vec<String>,
}

/// Dependency hints are capped at the first 50 capitalized references.
pub const MAX_DEPENDENCY_HINTS: usize = 50;

impl ClassMetrics {
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            fully_qualified_name: name.clone(),
            name,
            file_path: file_path.into(),
            line_count: 0,
            method_count: 0,
            property_count: 0,
            field_count: 0,
            cyclomatic: 0,
            methods: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Attach the extracted methods, updating the derived counts.
    pub fn with_methods(mut self, methods: Vec<MethodMetrics>) -> Self {
        self.method_count = methods.len();
        self.cyclomatic = methods.iter().map(|m| m.cyclomatic).sum();
        self.methods = methods;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_methods_updates_counts() {
        let mut a = MethodMetrics::new("alpha");
        a.cyclomatic = 3;
        let mut b = MethodMetrics::new("beta");
        b.cyclomatic = 4;

        let class = ClassMetrics::new("Widget", "widget.rs").with_methods(vec![a, b]);

        assert_eq!(class.method_count, 2);
        assert_eq!(class.cyclomatic, 7);
    }

    #[test]
    fn zero_methods_means_zero_complexity() {
        let class = ClassMetrics::new("Empty", "empty.rs").with_methods(vec![]);
        assert_eq!(class.cyclomatic, 0);
        assert_eq!(class.method_count, 0);
    }
}
