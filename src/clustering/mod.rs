//! Responsibility clustering for god classes.
//!
//! Partitions a god class's methods into cohesive groups via k-means over
//! TF + structural feature vectors, then names and scores each group. The
//! feature matrix is dropped as soon as the cluster list is produced.

pub mod features;
pub mod kmeans;
pub mod naming;

use std::collections::BTreeMap;

use crate::config::Thresholds;
use crate::core::errors::{Error, Result};
use crate::core::{ClassMetrics, MethodMetrics, ResponsibilityCluster};

/// Propose extractions for a god class.
///
/// Returns an empty list when the class has fewer than `min_cluster_size`
/// methods or when every candidate cluster is rejected. Clusters are
/// ordered by descending cohesion.
pub fn suggest_extractions(
    class: &ClassMetrics,
    thresholds: &Thresholds,
) -> Result<Vec<ResponsibilityCluster>> {
    let methods = &class.methods;
    if methods.len() < thresholds.min_cluster_size {
        return Ok(Vec::new());
    }

    let vocabulary = features::build_vocabulary(methods);
    let matrix = features::build_feature_matrix(methods, &vocabulary);

    let result = kmeans::cluster(&matrix).ok_or_else(|| {
        Error::Clustering(format!(
            "no clustering of {} methods converged for '{}'",
            methods.len(),
            class.name
        ))
    })?;
    drop(matrix);

    // Group method indices by label; BTreeMap keeps group order stable.
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, &label) in result.labels.iter().enumerate() {
        groups.entry(label).or_default().push(index);
    }

    let mut clusters: Vec<ResponsibilityCluster> = groups
        .into_values()
        .filter(|indices| indices.len() >= thresholds.min_cluster_size)
        .map(|indices| build_cluster(&indices, methods, &class.name))
        .collect();

    // Descending cohesion; stable so equal scores keep label order
    clusters.sort_by(|a, b| b.cohesion_score.total_cmp(&a.cohesion_score));
    Ok(clusters)
}

fn build_cluster(
    indices: &[usize],
    methods: &[MethodMetrics],
    parent_class: &str,
) -> ResponsibilityCluster {
    let members: Vec<&MethodMetrics> = indices.iter().map(|&i| &methods[i]).collect();
    let shared = naming::shared_dependencies(&members);

    ResponsibilityCluster {
        suggested_name: naming::suggest_name(&members, parent_class),
        methods: members.iter().map(|m| m.name.clone()).collect(),
        cohesion_score: naming::cohesion_score(&members, &shared),
        justification: naming::justification(&members, &shared),
        shared_dependencies: shared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, accessed: &[&str], tokens: &[&str]) -> MethodMetrics {
        let mut m = MethodMetrics::new(name);
        m.accessed_identifiers = accessed.iter().map(|s| s.to_string()).collect();
        m.tokens = tokens.iter().map(|s| s.to_string()).collect();
        m.line_count = 10;
        m.cyclomatic = 2;
        m
    }

    fn auth_class() -> ClassMetrics {
        let token = &["tokenStore", "clock"];
        let email = &["validator", "directory"];
        ClassMetrics::new("AccountManager", "accounts.rs").with_methods(vec![
            method("generateToken", token, &["generate", "token"]),
            method("refreshToken", token, &["refresh", "token"]),
            method("revokeToken", token, &["revoke", "token"]),
            method("validateEmail", email, &["validate", "email"]),
            method("validatePassword", email, &["validate", "password"]),
            method("checkEmailUnique", email, &["check", "email", "unique"]),
        ])
    }

    #[test]
    fn small_classes_are_not_clustered() {
        let class = ClassMetrics::new("Tiny", "tiny.rs").with_methods(vec![
            method("alpha", &[], &["alpha"]),
            method("beta", &[], &["beta"]),
        ]);
        let clusters = suggest_extractions(&class, &Thresholds::default()).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn cluster_methods_belong_to_the_class() {
        let class = auth_class();
        let clusters = suggest_extractions(&class, &Thresholds::default()).unwrap();
        let class_names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();

        for cluster in &clusters {
            for name in &cluster.methods {
                assert!(class_names.contains(&name.as_str()));
            }
        }
    }

    #[test]
    fn clusters_are_sorted_by_descending_cohesion() {
        let clusters = suggest_extractions(&auth_class(), &Thresholds::default()).unwrap();
        for pair in clusters.windows(2) {
            assert!(pair[0].cohesion_score >= pair[1].cohesion_score);
        }
        for cluster in &clusters {
            assert!((0.0..=1.0).contains(&cluster.cohesion_score));
            assert!(cluster.methods.len() >= 3);
        }
    }

    #[test]
    fn clustering_is_deterministic() {
        let class = auth_class();
        let a = suggest_extractions(&class, &Thresholds::default()).unwrap();
        let b = suggest_extractions(&class, &Thresholds::default()).unwrap();
        assert_eq!(a, b);
    }
}
