pub mod errors;
pub mod metrics;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use metrics::{ClassMetrics, MethodMetrics, MAX_DEPENDENCY_HINTS};
pub use tree::{NodeKind, TreeNode};

/// A single threshold violation.
///
/// The `Display` impl renders the human-readable violation string used in
/// reports; the structured fields keep scoring and serialization exact.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub actual: usize,
    pub threshold: usize,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    Lines,
    Complexity,
    MethodCount,
    ParameterCount,
    ClassesPerFile,
    FileLines,
}

impl Violation {
    pub fn new(kind: ViolationKind, actual: usize, threshold: usize) -> Self {
        Self {
            kind,
            actual,
            threshold,
        }
    }

    /// Amount by which the threshold was exceeded
    pub fn excess(&self) -> usize {
        self.actual.saturating_sub(self.threshold)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let noun = match self.kind {
            ViolationKind::Lines => "lines",
            ViolationKind::Complexity => "cyclomatic complexity",
            ViolationKind::MethodCount => "methods",
            ViolationKind::ParameterCount => "parameters",
            ViolationKind::ClassesPerFile => "classes in file",
            ViolationKind::FileLines => "total file lines",
        };
        write!(f, "{} {} (limit {})", self.actual, noun, self.threshold)
    }
}

/// A proposed extraction from a god class: a subset of its methods believed
/// to share a responsibility.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResponsibilityCluster {
    pub suggested_name: String,
    /// Names of the included methods, each belonging to the parent class
    pub methods: Vec<String>,
    /// Normalized [0,1] measure of shared identifier references
    pub cohesion_score: f64,
    pub shared_dependencies: Vec<String>,
    pub justification: String,
}

/// A method that exceeded one or more thresholds
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GodMethodRecord {
    pub metrics: MethodMetrics,
    pub class_name: String,
    pub file_path: PathBuf,
    pub violations: Vec<Violation>,
    pub violation_score: usize,
}

/// Verdict for a file whose class count or total line count exceeded the
/// file-level thresholds. Absent on clean files.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GodFileVerdict {
    pub path: PathBuf,
    pub class_count: usize,
    pub total_lines: usize,
    pub class_names: Vec<String>,
    pub violations: Vec<Violation>,
    pub violation_score: usize,
}

/// Full analysis outcome for one class
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassOutcome {
    pub metrics: ClassMetrics,
    pub is_god_class: bool,
    pub violations: Vec<Violation>,
    pub violation_score: usize,
    /// Produced by the clusterer; empty unless the class is god
    pub suggested_extractions: Vec<ResponsibilityCluster>,
    pub god_methods: Vec<GodMethodRecord>,
    pub summary: String,
}

impl ClassOutcome {
    pub fn has_issues(&self) -> bool {
        self.is_god_class || !self.god_methods.is_empty()
    }
}

/// Analysis outcome for one source file
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub classes: Vec<ClassOutcome>,
    pub god_file: Option<GodFileVerdict>,
    /// Per-file IO or parse failure; never aborts the run
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn failed(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            classes: Vec::new(),
            god_file: None,
            error: Some(error.into()),
        }
    }
}

/// Flat report over the whole enriched tree
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AnalysisReport {
    pub files_analyzed: usize,
    pub total_classes: usize,
    /// Sorted by violation score, worst first
    pub god_files: Vec<GodFileVerdict>,
    /// Sorted by violation score, worst first
    pub god_classes: Vec<ClassOutcome>,
    pub total_god_methods: usize,
    /// Classes with god methods that are not themselves god classes
    pub classes_with_god_methods: Vec<ClassOutcome>,
    pub healthy_classes: usize,
    /// Per-file error annotations; these do not affect the exit status
    pub file_errors: Vec<FileError>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

impl AnalysisReport {
    /// True iff any god file, god class, or god method was found.
    /// Parser errors alone never make this true.
    pub fn has_issues(&self) -> bool {
        !self.god_files.is_empty()
            || !self.god_classes.is_empty()
            || self.total_god_methods > 0
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["rs"], Language::Rust),
            (&["py"], Language::Python),
            (&["js", "jsx", "mjs", "cjs"], Language::JavaScript),
            (&["ts", "tsx"], Language::TypeScript),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
    }

    /// Single-line comment marker used when counting code lines
    pub fn comment_marker(&self) -> &'static str {
        match self {
            Language::Python => "#",
            _ => "//",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Language::Rust => "Rust",
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_is_human_readable() {
        let v = Violation::new(ViolationKind::Lines, 82, 50);
        assert_eq!(v.to_string(), "82 lines (limit 50)");
        assert_eq!(v.excess(), 32);
    }

    #[test]
    fn report_issues_ignore_file_errors() {
        let mut report = AnalysisReport::default();
        report.file_errors.push(FileError {
            path: PathBuf::from("broken.rs"),
            message: "unexpected token".into(),
        });
        assert!(!report.has_issues());

        report.total_god_methods = 1;
        assert!(report.has_issues());
    }

    #[test]
    fn language_from_extension() {
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("java"), None);
    }
}
