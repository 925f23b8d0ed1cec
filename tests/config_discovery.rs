//! Configuration discovery and its effect on analysis.

use godmap::config::{GodmapConfig, Thresholds};
use godmap::engine::AnalysisEngine;
use godmap::ParserRegistry;
use std::fs;

#[test]
fn discovers_config_in_ancestor_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("godmap.toml"),
        "[detection_thresholds]\nmax_methods = 7\n",
    )
    .unwrap();
    let nested = dir.path().join("src/inner");
    fs::create_dir_all(&nested).unwrap();

    let config = GodmapConfig::discover(&nested).unwrap();
    assert_eq!(config.detection_thresholds.max_methods, 7);
    assert_eq!(config.detection_thresholds.max_file_lines, 500);
}

#[test]
fn nearest_config_wins() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("godmap.toml"),
        "[detection_thresholds]\nmax_methods = 7\n",
    )
    .unwrap();
    let nested = dir.path().join("service");
    fs::create_dir(&nested).unwrap();
    fs::write(
        nested.join("godmap.toml"),
        "[detection_thresholds]\nmax_methods = 4\n",
    )
    .unwrap();

    let config = GodmapConfig::discover(&nested).unwrap();
    assert_eq!(config.detection_thresholds.max_methods, 4);
}

#[test]
fn missing_config_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = GodmapConfig::discover(dir.path()).unwrap();
    assert_eq!(config.detection_thresholds, Thresholds::default());
    assert!(config.ignore.directories.is_empty());
}

#[test]
fn ignore_directories_reach_the_walker() {
    let dir = tempfile::tempdir().unwrap();
    let generated = dir.path().join("codegen");
    fs::create_dir(&generated).unwrap();
    fs::write(generated.join("big.rs"), "struct Gen;\n").unwrap();
    fs::write(dir.path().join("lib.rs"), "struct Lib;\n").unwrap();

    let config = GodmapConfig::from_toml("[ignore]\ndirectories = [\"codegen\"]\n").unwrap();
    let engine = AnalysisEngine::new(
        ParserRegistry::with_defaults(),
        config.detection_thresholds.clone(),
    )
    .with_extra_ignores(config.ignore.directories.clone());

    let analysis = engine.run(dir.path()).unwrap();
    assert_eq!(analysis.report.files_analyzed, 1);
}
