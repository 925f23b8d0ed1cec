//! Language parsers and the extension-keyed registry.
//!
//! Each parser turns one source file into the list of classes it declares,
//! with per-method structural metrics. Dispatch is by file extension
//! through [`ParserRegistry`], a plain value passed to the engine; adding a
//! language never touches the engine.

pub mod javascript;
pub mod python;
pub mod rust;
pub mod tokens;

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::core::errors::{Error, Result};
use crate::core::{ClassMetrics, Language, MethodMetrics, MAX_DEPENDENCY_HINTS};

/// Capability set of a language parser.
///
/// `parse_file` fails with `Error::Io` when the file cannot be read and
/// `Error::Parse` when the source is unrecoverable. Recoverable syntax
/// damage yields the classes that were still recognizable; an empty file
/// yields an empty list.
pub trait ClassParser: Send + Sync {
    /// Parse source text already in memory (the file-free core).
    fn parse_source(&self, source: &str, path: &Path) -> Result<Vec<ClassMetrics>>;

    fn extensions(&self) -> &'static [&'static str];

    fn language(&self) -> Language;

    fn parse_file(&self, path: &Path) -> Result<Vec<ClassMetrics>> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.parse_source(&source, path)
    }
}

/// Extension -> parser mapping. Lookup is total for every file the walker
/// admits, because the walker derives its extension set from here.
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: HashMap<&'static str, Arc<dyn ClassParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Registry with every built-in language parser.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(rust::RustParser::new()));
        registry.register(Arc::new(python::PythonParser::new()));
        registry.register(Arc::new(javascript::JsParser::javascript()));
        registry.register(Arc::new(javascript::JsParser::typescript()));
        registry
    }

    pub fn register(&mut self, parser: Arc<dyn ClassParser>) {
        for extension in parser.extensions() {
            self.parsers.insert(extension, parser.clone());
        }
    }

    pub fn parser_for(&self, path: &Path) -> Option<&Arc<dyn ClassParser>> {
        let extension = path.extension()?.to_str()?;
        self.parsers.get(extension)
    }

    pub fn recognizes(&self, path: &Path) -> bool {
        self.parser_for(path).is_some()
    }

    /// Every registered extension, sorted for deterministic reporting.
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = self.parsers.keys().copied().collect();
        extensions.sort_unstable();
        extensions
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Class dependency hints: import directives first, then the first
/// capitalized identifier references found across the methods, capped at
/// [`MAX_DEPENDENCY_HINTS`]. Heuristic metadata, not a call graph.
pub(crate) fn dependency_hints(imports: &[String], methods: &[MethodMetrics]) -> Vec<String> {
    let mut hints: Vec<String> = imports.to_vec();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut capitalized = 0usize;

    'outer: for method in methods {
        for identifier in method
            .accessed_identifiers
            .iter()
            .chain(method.called_methods.iter())
        {
            for piece in identifier.split(|c| c == ':' || c == '.') {
                if tokens::is_capitalized(piece) && seen.insert(piece) {
                    hints.push(piece.to_string());
                    capitalized += 1;
                    if capitalized >= MAX_DEPENDENCY_HINTS {
                        break 'outer;
                    }
                }
            }
        }
    }

    hints
}
