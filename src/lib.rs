//! godmap: static analysis of god files, god classes, and god methods.
//!
//! The analysis core is [`engine::AnalysisEngine`]: it walks a root path
//! into an immutable tree, parses each recognized source file into class
//! and method metrics, classifies them against [`config::Thresholds`],
//! clusters the methods of god classes into suggested extractions, and
//! returns the enriched tree plus a flat report.

pub mod analyzers;
pub mod cli;
pub mod clustering;
pub mod config;
pub mod core;
pub mod detection;
pub mod engine;
pub mod io;
pub mod observability;

use std::path::Path;

pub use crate::analyzers::{ClassParser, ParserRegistry};
pub use crate::config::{GodmapConfig, Thresholds};
pub use crate::core::errors::{Error, Result};
pub use crate::core::{AnalysisReport, ClassOutcome, FileOutcome, TreeNode};
pub use crate::engine::{Analysis, AnalysisEngine, CancellationFlag};

/// Analyze `root` with the default parser registry.
pub fn analyze_path(root: &Path, thresholds: Thresholds) -> Result<Analysis> {
    AnalysisEngine::new(ParserRegistry::with_defaults(), thresholds).run(root)
}
