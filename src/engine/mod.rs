//! Analysis orchestration.
//!
//! Builds the project tree, enriches it in parallel (each directory fans
//! its children out across the rayon pool; order is preserved by the
//! indexed collect), then folds the enriched tree into a flat report.
//! There is no shared mutable state: every file produces a fresh
//! [`FileOutcome`] and parents recombine child results in traversal order.

use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::analyzers::ParserRegistry;
use crate::clustering;
use crate::config::Thresholds;
use crate::core::errors::{Error, Result};
use crate::core::{
    AnalysisReport, ClassMetrics, ClassOutcome, FileError, FileOutcome, GodMethodRecord,
    NodeKind, TreeNode,
};
use crate::detection;
use crate::io::walker::TreeBuilder;

/// Shared cancellation signal. Tasks observe it at node boundaries and
/// abandon; the engine then returns `Error::Cancelled` with no partial
/// results.
#[derive(Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one analysis run: the enriched tree plus the flat report.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub tree: TreeNode,
    pub report: AnalysisReport,
}

pub struct AnalysisEngine {
    registry: Arc<ParserRegistry>,
    thresholds: Thresholds,
    extra_ignores: Vec<String>,
    cancel: CancellationFlag,
}

impl AnalysisEngine {
    pub fn new(registry: ParserRegistry, thresholds: Thresholds) -> Self {
        Self {
            registry: Arc::new(registry),
            thresholds,
            extra_ignores: Vec::new(),
            cancel: CancellationFlag::new(),
        }
    }

    pub fn with_extra_ignores(mut self, directories: Vec<String>) -> Self {
        self.extra_ignores = directories;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run a cold analysis of `root`. Fails only on a missing root,
    /// cancellation, or (never per-file) internal errors.
    pub fn run(&self, root: &Path) -> Result<Analysis> {
        tracing::info!(root = %root.display(), "starting analysis");

        let tree = TreeBuilder::new(&self.registry)
            .with_extra_ignores(&self.extra_ignores)
            .build(root)?;

        let enriched = self.enrich(&tree)?;
        let report = build_report(&enriched);

        tracing::info!(
            files = report.files_analyzed,
            classes = report.total_classes,
            god_files = report.god_files.len(),
            god_classes = report.god_classes.len(),
            god_methods = report.total_god_methods,
            "analysis complete"
        );

        Ok(Analysis {
            tree: enriched,
            report,
        })
    }

    fn enrich(&self, node: &TreeNode) -> Result<TreeNode> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        match node.kind {
            NodeKind::Directory => {
                let children: Result<Vec<Arc<TreeNode>>> = node
                    .children
                    .par_iter()
                    .map(|child| self.enrich(child).map(Arc::new))
                    .collect();
                Ok(node.with_children(children?))
            }
            NodeKind::File => Ok(node.with_outcome(self.analyze_file(&node.path))),
        }
    }

    fn analyze_file(&self, path: &Path) -> FileOutcome {
        let Some(parser) = self.registry.parser_for(path) else {
            return FileOutcome::failed(path, "no parser registered for this extension");
        };

        let classes = match parser.parse_file(path) {
            Ok(classes) => classes,
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "file skipped");
                return FileOutcome::failed(path, error.to_string());
            }
        };

        let god_file = detection::classify_file(path, &classes, &self.thresholds);
        let outcomes = classes
            .into_iter()
            .map(|class| self.analyze_class(class))
            .collect();

        FileOutcome {
            path: path.to_path_buf(),
            classes: outcomes,
            god_file,
            error: None,
        }
    }

    fn analyze_class(&self, metrics: ClassMetrics) -> ClassOutcome {
        let verdict = detection::classify_class(&metrics, &self.thresholds);

        let god_methods: Vec<GodMethodRecord> = metrics
            .methods
            .iter()
            .filter_map(|method| {
                let method_verdict = detection::classify_method(method, &self.thresholds);
                method_verdict.is_god.then(|| GodMethodRecord {
                    metrics: method.clone(),
                    class_name: metrics.name.clone(),
                    file_path: metrics.file_path.clone(),
                    violations: method_verdict.violations,
                    violation_score: method_verdict.violation_score,
                })
            })
            .collect();

        let (suggested_extractions, clustering_note) = if verdict.is_god {
            match clustering::suggest_extractions(&metrics, &self.thresholds) {
                Ok(clusters) => (clusters, None),
                Err(error) => {
                    tracing::warn!(class = %metrics.name, %error, "clustering failed");
                    (Vec::new(), Some(error.to_string()))
                }
            }
        } else {
            (Vec::new(), None)
        };

        let summary = summarize(
            &metrics,
            &verdict,
            god_methods.len(),
            suggested_extractions.len(),
            clustering_note.as_deref(),
        );

        ClassOutcome {
            metrics,
            is_god_class: verdict.is_god,
            violations: verdict.violations,
            violation_score: verdict.violation_score,
            suggested_extractions,
            god_methods,
            summary,
        }
    }
}

fn summarize(
    metrics: &ClassMetrics,
    verdict: &detection::Verdict,
    god_method_count: usize,
    extraction_count: usize,
    clustering_note: Option<&str>,
) -> String {
    let mut summary = if verdict.is_god {
        let violations: Vec<String> = verdict.violations.iter().map(|v| v.to_string()).collect();
        format!(
            "Class '{}' exceeds thresholds: {}",
            metrics.name,
            violations.join("; ")
        )
    } else {
        format!("Class '{}' is within acceptable thresholds", metrics.name)
    };

    if verdict.is_god {
        match clustering_note {
            Some(note) => summary.push_str(&format!("; clustering unavailable: {note}")),
            None => summary.push_str(&format!("; {extraction_count} extraction(s) suggested")),
        }
    }
    if god_method_count > 0 {
        summary.push_str(&format!("; {god_method_count} god method(s)"));
    }

    summary
}

/// Sequential fold of the enriched tree into the flat report.
fn build_report(tree: &TreeNode) -> AnalysisReport {
    let mut report = AnalysisReport::default();

    tree.visit(&mut |node| {
        let Some(outcome) = node.outcome.as_deref() else {
            return;
        };
        report.files_analyzed += 1;

        if let Some(message) = &outcome.error {
            report.file_errors.push(FileError {
                path: outcome.path.clone(),
                message: message.clone(),
            });
        }
        if let Some(god_file) = &outcome.god_file {
            report.god_files.push(god_file.clone());
        }

        for class in &outcome.classes {
            report.total_classes += 1;
            report.total_god_methods += class.god_methods.len();

            if class.is_god_class {
                report.god_classes.push(class.clone());
            } else if !class.god_methods.is_empty() {
                report.classes_with_god_methods.push(class.clone());
            } else {
                report.healthy_classes += 1;
            }
        }
    });

    // Worst offenders first; stable sort keeps traversal order on ties
    report
        .god_files
        .sort_by(|a, b| b.violation_score.cmp(&a.violation_score));
    report
        .god_classes
        .sort_by(|a, b| b.violation_score.cmp(&a.violation_score));

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_flag_round_trip() {
        let flag = CancellationFlag::new();
        assert!(!flag.is_cancelled());
        let shared = flag.clone();
        shared.cancel();
        assert!(flag.is_cancelled());
    }
}
