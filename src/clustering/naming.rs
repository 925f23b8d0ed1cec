//! Cluster enrichment: suggested names, cohesion, shared dependencies,
//! and justification text.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::analyzers::tokens::split_identifier;
use crate::core::MethodMetrics;

/// Generic verbs that carry no responsibility signal in method names
static STOP_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "get", "set", "add", "remove", "delete", "update", "create", "save", "load", "handle",
        "process", "execute", "run", "do", "is", "has", "can",
    ]
});

/// Suggest a class name for a cluster: the two most frequent non-stop-word
/// name fragments (ties by first appearance), capitalized and concatenated
/// with a `Service` suffix. Falls back to `{Parent}Component` when nothing
/// survives filtering.
pub fn suggest_name(methods: &[&MethodMetrics], parent_class: &str) -> String {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for method in methods {
        for fragment in split_identifier(&method.name) {
            if STOP_WORDS.contains(&fragment.as_str()) {
                continue;
            }
            if !frequency.contains_key(&fragment) {
                order.push(fragment.clone());
            }
            *frequency.entry(fragment).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(usize, String)> = order
        .iter()
        .map(|token| (frequency[token], token.clone()))
        .collect();
    // Highest frequency first; ties keep first-appearance order
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let top: Vec<String> = ranked
        .into_iter()
        .take(2)
        .map(|(_, token)| capitalize(&token))
        .collect();

    if top.is_empty() {
        format!("{parent_class}Component")
    } else {
        format!("{}Service", top.join(""))
    }
}

/// Identifiers accessed by at least half (rounded up) of the cluster
/// methods, in sorted order.
pub fn shared_dependencies(methods: &[&MethodMetrics]) -> Vec<String> {
    let quorum = methods.len().div_ceil(2);
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for method in methods {
        for identifier in &method.accessed_identifiers {
            *counts.entry(identifier.as_str()).or_insert(0) += 1;
        }
    }

    let mut shared: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count >= quorum)
        .map(|(identifier, _)| identifier.to_string())
        .collect();
    shared.sort();
    shared
}

/// Cohesion: shared dependency count over the mean accessed-identifier
/// count (plus one), clamped to [0,1]. Singleton clusters score 0.5.
pub fn cohesion_score(methods: &[&MethodMetrics], shared: &[String]) -> f64 {
    if methods.len() == 1 {
        return 0.5;
    }

    let mean_accessed = methods
        .iter()
        .map(|m| m.accessed_identifiers.len() as f64 + 1.0)
        .sum::<f64>()
        / methods.len() as f64;

    (shared.len() as f64 / mean_accessed).clamp(0.0, 1.0)
}

/// One-sentence rationale listing up to five method names and up to three
/// shared dependencies.
pub fn justification(methods: &[&MethodMetrics], shared: &[String]) -> String {
    let names: Vec<&str> = methods.iter().take(5).map(|m| m.name.as_str()).collect();
    let deps: Vec<&str> = shared.iter().take(3).map(String::as_str).collect();

    format!(
        "Cohesive group of {} method(s) ({}) sharing dependencies on ({})",
        methods.len(),
        names.join(", "),
        deps.join(", "),
    )
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
