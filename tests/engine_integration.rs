//! End-to-end engine tests over temporary source trees.

use godmap::config::Thresholds;
use godmap::engine::{AnalysisEngine, CancellationFlag};
use godmap::{analyze_path, Error, ParserRegistry};
use std::fs;
use std::path::Path;

fn engine() -> AnalysisEngine {
    AnalysisEngine::new(ParserRegistry::with_defaults(), Thresholds::default())
}

#[test]
fn missing_root_fails_with_path_not_found() {
    let result = engine().run(Path::new("/no/such/root"));
    assert!(matches!(result, Err(Error::PathNotFound(_))));
}

#[test]
fn empty_directory_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = engine().run(dir.path()).unwrap();

    assert_eq!(analysis.report.files_analyzed, 0);
    assert_eq!(analysis.report.total_classes, 0);
    assert!(analysis.report.god_files.is_empty());
    assert!(analysis.report.god_classes.is_empty());
    assert_eq!(analysis.report.total_god_methods, 0);
    assert!(!analysis.report.has_issues());
}

#[test]
fn analyzes_all_supported_languages() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("counter.rs"),
        "struct Counter { value: u32 }\nimpl Counter {\n    fn get(&self) -> u32 { self.value }\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("store.py"),
        "class Store:\n    def read(self):\n        return self.data\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("cart.js"),
        "class Cart {\n  total() { return 0; }\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not source").unwrap();

    let analysis = engine().run(dir.path()).unwrap();
    assert_eq!(analysis.report.files_analyzed, 3);
    assert_eq!(analysis.report.total_classes, 3);
    assert_eq!(analysis.report.healthy_classes, 3);
    assert!(!analysis.report.has_issues());
}

#[test]
fn artifact_directories_are_excluded() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("target")).unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join("target/gen.rs"), "struct G;\n").unwrap();
    fs::write(dir.path().join(".git/hook.py"), "class H:\n    pass\n").unwrap();
    fs::write(dir.path().join("real.rs"), "struct R;\n").unwrap();

    let analysis = engine().run(dir.path()).unwrap();
    assert_eq!(analysis.report.files_analyzed, 1);
}

#[test]
fn too_many_classes_make_a_god_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = String::new();
    for i in 0..5 {
        source.push_str(&format!(
            "class Part{i}:\n    def ping(self):\n        return {i}\n\n"
        ));
    }
    fs::write(dir.path().join("parts.py"), source).unwrap();

    let analysis = engine().run(dir.path()).unwrap();
    let report = &analysis.report;

    assert_eq!(report.god_files.len(), 1);
    assert_eq!(report.god_files[0].class_count, 5);
    assert_eq!(report.god_files[0].violation_score, 10);
    // No individual class exceeds class thresholds
    assert!(report.god_classes.is_empty());
    assert!(report.has_issues());
}

#[test]
fn god_class_detection_with_custom_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("hub.py"),
        "class Hub:\n\
         \x20   def route_message(self):\n        return self.queue\n\
         \x20   def route_event(self):\n        return self.queue\n\
         \x20   def route_signal(self):\n        return self.queue\n",
    )
    .unwrap();

    let thresholds = Thresholds {
        max_methods: 2,
        ..Thresholds::default()
    };
    let engine = AnalysisEngine::new(ParserRegistry::with_defaults(), thresholds);
    let analysis = engine.run(dir.path()).unwrap();

    assert_eq!(analysis.report.god_classes.len(), 1);
    let hub = &analysis.report.god_classes[0];
    assert!(hub.is_god_class);
    assert!(hub.summary.contains("Hub"));
    assert!(analysis.report.has_issues());
}

#[test]
fn broken_files_are_annotated_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.rs"), "struct {{{ nope").unwrap();
    fs::write(dir.path().join("fine.rs"), "struct Fine;\n").unwrap();

    let analysis = engine().run(dir.path()).unwrap();
    assert_eq!(analysis.report.files_analyzed, 2);
    assert_eq!(analysis.report.file_errors.len(), 1);
    assert!(analysis.report.file_errors[0]
        .path
        .ends_with("broken.rs"));
    // Parser errors alone never fail the run
    assert!(!analysis.report.has_issues());
}

#[test]
fn outcomes_are_attached_to_file_nodes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.rs"), "struct One;\n").unwrap();

    let analysis = engine().run(dir.path()).unwrap();
    let mut attached = 0;
    analysis.tree.visit(&mut |node| {
        if node.is_file() {
            assert!(node.outcome.is_some());
            attached += 1;
        }
    });
    assert_eq!(attached, 1);
}

#[test]
fn repeated_runs_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    for i in 0..6 {
        fs::write(
            dir.path().join(format!("nested/mod{i}.rs")),
            format!(
                "struct Unit{i};\nimpl Unit{i} {{\n    fn act(&self, x: u32) -> u32 {{\n        if x > 0 {{ x }} else {{ 0 }}\n    }}\n}}\n"
            ),
        )
        .unwrap();
    }

    let first = engine().run(dir.path()).unwrap();
    let second = engine().run(dir.path()).unwrap();
    assert_eq!(first.report, second.report);
}

#[test]
fn cancellation_short_circuits() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.rs"), "struct A;\n").unwrap();

    let cancel = CancellationFlag::new();
    cancel.cancel();
    let engine = AnalysisEngine::new(ParserRegistry::with_defaults(), Thresholds::default())
        .with_cancellation(cancel);

    assert!(matches!(engine.run(dir.path()), Err(Error::Cancelled)));
}

#[test]
fn convenience_wrapper_matches_engine() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.rs"), "struct A;\n").unwrap();

    let analysis = analyze_path(dir.path(), Thresholds::default()).unwrap();
    assert_eq!(analysis.report.files_analyzed, 1);
}
