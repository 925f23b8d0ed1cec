//! Threshold-based god detection.
//!
//! Three total, deterministic, side-effect-free classifiers. Every
//! comparison is strict: a value exactly equal to its threshold is not a
//! violation, and a record is god iff its violations list is non-empty.

use std::path::Path;

use crate::config::Thresholds;
use crate::core::{
    ClassMetrics, GodFileVerdict, MethodMetrics, Violation, ViolationKind,
};

/// Classification result for a class or a method
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub is_god: bool,
    pub violations: Vec<Violation>,
    pub violation_score: usize,
}

impl Verdict {
    fn from_violations(violations: Vec<Violation>, violation_score: usize) -> Self {
        Self {
            is_god: !violations.is_empty(),
            violations,
            violation_score,
        }
    }
}

/// A class is god iff its line count, method count, or summed cyclomatic
/// complexity strictly exceeds its threshold.
pub fn classify_class(metrics: &ClassMetrics, thresholds: &Thresholds) -> Verdict {
    let mut violations = Vec::new();

    if metrics.line_count > thresholds.max_class_lines {
        violations.push(Violation::new(
            ViolationKind::Lines,
            metrics.line_count,
            thresholds.max_class_lines,
        ));
    }
    if metrics.method_count > thresholds.max_methods {
        violations.push(Violation::new(
            ViolationKind::MethodCount,
            metrics.method_count,
            thresholds.max_methods,
        ));
    }
    if metrics.cyclomatic > thresholds.max_class_complexity {
        violations.push(Violation::new(
            ViolationKind::Complexity,
            metrics.cyclomatic as usize,
            thresholds.max_class_complexity as usize,
        ));
    }

    let score = score_from(&violations, &[
        (ViolationKind::Lines, 1),
        (ViolationKind::MethodCount, 2),
        (ViolationKind::Complexity, 1),
    ]);
    Verdict::from_violations(violations, score)
}

/// A method is god iff its line count, cyclomatic complexity, or parameter
/// count strictly exceeds its threshold.
///
/// Score: `excess_lines * 1 + excess_complexity * 2 + excess_params * 1`.
pub fn classify_method(metrics: &MethodMetrics, thresholds: &Thresholds) -> Verdict {
    let mut violations = Vec::new();

    if metrics.line_count > thresholds.max_method_lines {
        violations.push(Violation::new(
            ViolationKind::Lines,
            metrics.line_count,
            thresholds.max_method_lines,
        ));
    }
    if metrics.cyclomatic > thresholds.max_method_complexity {
        violations.push(Violation::new(
            ViolationKind::Complexity,
            metrics.cyclomatic as usize,
            thresholds.max_method_complexity as usize,
        ));
    }
    if metrics.parameter_count() > thresholds.max_method_parameters {
        violations.push(Violation::new(
            ViolationKind::ParameterCount,
            metrics.parameter_count(),
            thresholds.max_method_parameters,
        ));
    }

    let score = score_from(&violations, &[
        (ViolationKind::Lines, 1),
        (ViolationKind::Complexity, 2),
        (ViolationKind::ParameterCount, 1),
    ]);
    Verdict::from_violations(violations, score)
}

/// A file is god iff its class count or total class line count strictly
/// exceeds the file-level thresholds. Returns `None` for clean files.
///
/// Score: `excess_classes * 5 + excess_lines * 1`.
pub fn classify_file(
    path: &Path,
    classes: &[ClassMetrics],
    thresholds: &Thresholds,
) -> Option<GodFileVerdict> {
    let class_count = classes.len();
    let total_lines: usize = classes.iter().map(|c| c.line_count).sum();
    let mut violations = Vec::new();

    if class_count > thresholds.max_classes_per_file {
        violations.push(Violation::new(
            ViolationKind::ClassesPerFile,
            class_count,
            thresholds.max_classes_per_file,
        ));
    }
    if total_lines > thresholds.max_file_lines {
        violations.push(Violation::new(
            ViolationKind::FileLines,
            total_lines,
            thresholds.max_file_lines,
        ));
    }

    if violations.is_empty() {
        return None;
    }

    let violation_score = score_from(&violations, &[
        (ViolationKind::ClassesPerFile, 5),
        (ViolationKind::FileLines, 1),
    ]);

    Some(GodFileVerdict {
        path: path.to_path_buf(),
        class_count,
        total_lines,
        class_names: classes.iter().map(|c| c.name.clone()).collect(),
        violations,
        violation_score,
    })
}

fn score_from(violations: &[Violation], weights: &[(ViolationKind, usize)]) -> usize {
    violations
        .iter()
        .map(|v| {
            let weight = weights
                .iter()
                .find(|(kind, _)| *kind == v.kind)
                .map(|(_, w)| *w)
                .unwrap_or(1);
            v.excess() * weight
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(lines: usize, complexity: u32, params: usize) -> MethodMetrics {
        let mut m = MethodMetrics::new("subject");
        m.line_count = lines;
        m.cyclomatic = complexity;
        m.parameters = (0..params).map(|i| format!("p{i}")).collect();
        m
    }

    #[test]
    fn exact_threshold_is_not_a_violation() {
        let thresholds = Thresholds::default();
        let verdict = classify_method(&method(50, 10, 5), &thresholds);
        assert!(!verdict.is_god);
        assert!(verdict.violations.is_empty());
        assert_eq!(verdict.violation_score, 0);
    }

    #[test]
    fn score_is_zero_iff_not_god() {
        let thresholds = Thresholds::default();
        for m in [method(10, 1, 0), method(51, 1, 0), method(10, 11, 0)] {
            let verdict = classify_method(&m, &thresholds);
            assert_eq!(verdict.is_god, verdict.violation_score > 0);
        }
    }

    #[test]
    fn long_complex_method_scores_44() {
        // 82 lines, complexity 16, 1 parameter: 32*1 + 6*2 + 0 = 44
        let verdict = classify_method(&method(82, 16, 1), &Thresholds::default());
        assert!(verdict.is_god);
        assert_eq!(verdict.violations.len(), 2);
        assert_eq!(verdict.violation_score, 44);
    }

    #[test]
    fn parameter_only_violation_scores_1() {
        let verdict = classify_method(&method(12, 1, 6), &Thresholds::default());
        assert!(verdict.is_god);
        assert_eq!(verdict.violations.len(), 1);
        assert_eq!(verdict.violations[0].kind, ViolationKind::ParameterCount);
        assert_eq!(verdict.violation_score, 1);
    }

    #[test]
    fn class_verdict_matches_threshold_disjunction() {
        let thresholds = Thresholds::default();
        let mut class = ClassMetrics::new("Widget", "widget.rs");
        class.line_count = 300;
        class.method_count = 20;
        class.cyclomatic = 50;
        assert!(!classify_class(&class, &thresholds).is_god);

        class.line_count = 301;
        assert!(classify_class(&class, &thresholds).is_god);

        class.line_count = 300;
        class.cyclomatic = 51;
        assert!(classify_class(&class, &thresholds).is_god);
    }

    #[test]
    fn god_by_lines_with_zero_methods() {
        let mut class = ClassMetrics::new("Bag", "bag.rs");
        class.line_count = 400;
        let verdict = classify_class(&class, &Thresholds::default());
        assert!(verdict.is_god);
        assert_eq!(verdict.violations.len(), 1);
        assert_eq!(verdict.violations[0].kind, ViolationKind::Lines);
    }

    #[test]
    fn five_small_classes_make_a_god_file() {
        let classes: Vec<ClassMetrics> = (0..5)
            .map(|i| {
                let mut c = ClassMetrics::new(format!("C{i}"), "many.rs");
                c.line_count = 84;
                c
            })
            .collect();

        let verdict =
            classify_file(Path::new("many.rs"), &classes, &Thresholds::default()).unwrap();
        assert_eq!(verdict.class_count, 5);
        assert_eq!(verdict.total_lines, 420);
        assert_eq!(verdict.violation_score, 10);
        assert_eq!(verdict.violations.len(), 1);
    }

    #[test]
    fn god_file_verdict_survives_class_permutation() {
        let mut classes: Vec<ClassMetrics> = (0..5)
            .map(|i| {
                let mut c = ClassMetrics::new(format!("C{i}"), "many.rs");
                c.line_count = 10 * (i + 1);
                c
            })
            .collect();

        let before = classify_file(Path::new("many.rs"), &classes, &Thresholds::default());
        classes.reverse();
        let after = classify_file(Path::new("many.rs"), &classes, &Thresholds::default());

        match (before, after) {
            (Some(a), Some(b)) => {
                assert_eq!(a.violation_score, b.violation_score);
                assert_eq!(a.total_lines, b.total_lines);
            }
            (None, None) => {}
            _ => panic!("permutation changed the verdict"),
        }
    }

    #[test]
    fn empty_class_list_is_never_a_god_file() {
        assert!(classify_file(Path::new("plain.rs"), &[], &Thresholds::default()).is_none());
    }
}
