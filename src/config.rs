//! Configuration loading for godmap.
//!
//! Configuration lives in `godmap.toml`, discovered in the analyzed
//! directory or the nearest ancestor. Missing keys take defaults; unknown
//! keys are ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::errors::{Error, Result};

/// Numeric limits and clustering knobs for god detection.
///
/// Immutable for the duration of one analysis run; every comparison
/// against a threshold is strict (`>`), so a value exactly at the limit is
/// not a violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    #[serde(default = "default_max_class_lines")]
    pub max_class_lines: usize,

    #[serde(default = "default_max_methods")]
    pub max_methods: usize,

    #[serde(default = "default_max_class_complexity")]
    pub max_class_complexity: u32,

    #[serde(default = "default_max_method_lines")]
    pub max_method_lines: usize,

    #[serde(default = "default_max_method_complexity")]
    pub max_method_complexity: u32,

    #[serde(default = "default_max_method_parameters")]
    pub max_method_parameters: usize,

    #[serde(default = "default_max_classes_per_file")]
    pub max_classes_per_file: usize,

    #[serde(default = "default_max_file_lines")]
    pub max_file_lines: usize,

    /// Clusters smaller than this are rejected
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,

    #[serde(default = "default_cluster_threshold")]
    pub cluster_threshold: f64,
}

fn default_max_class_lines() -> usize {
    300
}
fn default_max_methods() -> usize {
    20
}
fn default_max_class_complexity() -> u32 {
    50
}
fn default_max_method_lines() -> usize {
    50
}
fn default_max_method_complexity() -> u32 {
    10
}
fn default_max_method_parameters() -> usize {
    5
}
fn default_max_classes_per_file() -> usize {
    3
}
fn default_max_file_lines() -> usize {
    500
}
fn default_min_cluster_size() -> usize {
    3
}
fn default_cluster_threshold() -> f64 {
    0.7
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_class_lines: default_max_class_lines(),
            max_methods: default_max_methods(),
            max_class_complexity: default_max_class_complexity(),
            max_method_lines: default_max_method_lines(),
            max_method_complexity: default_max_method_complexity(),
            max_method_parameters: default_max_method_parameters(),
            max_classes_per_file: default_max_classes_per_file(),
            max_file_lines: default_max_file_lines(),
            min_cluster_size: default_min_cluster_size(),
            cluster_threshold: default_cluster_threshold(),
        }
    }
}

impl Thresholds {
    /// Validate thresholds are sensible
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_class_lines < self.max_method_lines {
            return Err("max_class_lines must be >= max_method_lines".into());
        }
        if !(0.0..=1.0).contains(&self.cluster_threshold) {
            return Err("cluster_threshold must be between 0.0 and 1.0".into());
        }
        if self.min_cluster_size < 2 {
            return Err("min_cluster_size must be >= 2".into());
        }
        Ok(())
    }
}

/// Extra directory basenames excluded from traversal, on top of the
/// built-in exclusion set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub directories: Vec<String>,
}

/// Root configuration structure for godmap
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GodmapConfig {
    #[serde(default, alias = "DetectionThresholds")]
    pub detection_thresholds: Thresholds,

    #[serde(default)]
    pub ignore: IgnoreConfig,
}

pub const CONFIG_FILE_NAME: &str = "godmap.toml";

impl GodmapConfig {
    /// Parse a configuration document. Unknown keys are ignored by serde's
    /// default behavior; missing keys take defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GodmapConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config
            .detection_thresholds
            .validate()
            .map_err(Error::Config)?;
        Ok(config)
    }

    /// Load from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Discover `godmap.toml` starting at `start` (a file or directory) and
    /// walking up; the nearest file wins. Defaults when none is found.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut dir = if start.is_file() {
            start.parent().map(Path::to_path_buf)
        } else {
            Some(start.to_path_buf())
        };

        while let Some(current) = dir {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "loading configuration");
                return Self::load_from(&candidate);
            }
            dir = current.parent().map(Path::to_path_buf);
        }

        Ok(Self::default())
    }
}

/// Commented default configuration written by `godmap init`.
pub fn default_config_template() -> String {
    let thresholds = Thresholds::default();
    format!(
        "# godmap configuration\n\
         #\n\
         # A value exactly equal to a limit is not a violation; detection\n\
         # triggers only on strict excess.\n\
         \n\
         [detection_thresholds]\n\
         max_class_lines = {}\n\
         max_methods = {}\n\
         max_class_complexity = {}\n\
         max_method_lines = {}\n\
         max_method_complexity = {}\n\
         max_method_parameters = {}\n\
         max_classes_per_file = {}\n\
         max_file_lines = {}\n\
         min_cluster_size = {}\n\
         cluster_threshold = {}\n\
         \n\
         [ignore]\n\
         # Extra directory basenames to skip during traversal\n\
         directories = []\n",
        thresholds.max_class_lines,
        thresholds.max_methods,
        thresholds.max_class_complexity,
        thresholds.max_method_lines,
        thresholds.max_method_complexity,
        thresholds.max_method_parameters,
        thresholds.max_classes_per_file,
        thresholds.max_file_lines,
        thresholds.min_cluster_size,
        thresholds.cluster_threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let t = Thresholds::default();
        assert_eq!(t.max_class_lines, 300);
        assert_eq!(t.max_methods, 20);
        assert_eq!(t.max_class_complexity, 50);
        assert_eq!(t.max_method_lines, 50);
        assert_eq!(t.max_method_complexity, 10);
        assert_eq!(t.max_method_parameters, 5);
        assert_eq!(t.max_classes_per_file, 3);
        assert_eq!(t.max_file_lines, 500);
        assert_eq!(t.min_cluster_size, 3);
        assert_eq!(t.cluster_threshold, 0.7);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = GodmapConfig::from_toml(
            "[detection_thresholds]\nmax_class_lines = 200\n",
        )
        .unwrap();
        assert_eq!(config.detection_thresholds.max_class_lines, 200);
        assert_eq!(config.detection_thresholds.max_methods, 20);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = GodmapConfig::from_toml(
            "[detection_thresholds]\nmax_methods = 10\nfuture_knob = 42\n\n[future_section]\nx = 1\n",
        )
        .unwrap();
        assert_eq!(config.detection_thresholds.max_methods, 10);
    }

    #[test]
    fn section_alias_is_accepted() {
        let config =
            GodmapConfig::from_toml("[DetectionThresholds]\nmax_file_lines = 100\n").unwrap();
        assert_eq!(config.detection_thresholds.max_file_lines, 100);
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let result = GodmapConfig::from_toml(
            "[detection_thresholds]\nmin_cluster_size = 1\n",
        );
        assert!(result.is_err());

        let result = GodmapConfig::from_toml(
            "[detection_thresholds]\ncluster_threshold = 1.5\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn template_round_trips() {
        let config = GodmapConfig::from_toml(&default_config_template()).unwrap();
        assert_eq!(config.detection_thresholds, Thresholds::default());
    }
}
