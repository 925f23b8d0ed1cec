//! Feature vector construction for method clustering.
//!
//! Each method becomes a numeric vector: TF weights over the class-wide
//! token vocabulary, followed by six normalized structural features.

use crate::core::MethodMetrics;

/// Number of structural features appended after the vocabulary block
pub const STRUCTURAL_FEATURES: usize = 6;

/// Token vocabulary of a class: the union of its methods' token bags, in
/// first-appearance order so feature columns are deterministic.
pub fn build_vocabulary(methods: &[MethodMetrics]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut vocabulary = Vec::new();
    for method in methods {
        for token in &method.tokens {
            if seen.insert(token.clone()) {
                vocabulary.push(token.clone());
            }
        }
    }
    vocabulary
}

/// One row per method, `vocabulary.len() + STRUCTURAL_FEATURES` columns.
pub fn build_feature_matrix(methods: &[MethodMetrics], vocabulary: &[String]) -> Vec<Vec<f64>> {
    methods
        .iter()
        .map(|method| feature_vector(method, vocabulary))
        .collect()
}

fn feature_vector(method: &MethodMetrics, vocabulary: &[String]) -> Vec<f64> {
    let mut vector = Vec::with_capacity(vocabulary.len() + STRUCTURAL_FEATURES);

    // TF weight per vocabulary token; the token bag is deduplicated, so
    // counts are 0 or 1 and the weight is 1/|tokens| for present tokens.
    let token_total = method.tokens.len().max(1) as f64;
    for token in vocabulary {
        let count = method.tokens.iter().filter(|t| *t == token).count() as f64;
        vector.push(count / token_total);
    }

    vector.push(method.line_count as f64 / 100.0);
    vector.push(method.cyclomatic as f64 / 20.0);
    vector.push(method.called_methods.len() as f64 / 10.0);
    vector.push(method.accessed_identifiers.len() as f64 / 10.0);
    vector.push(if method.is_public { 1.0 } else { 0.0 });
    vector.push(if method.is_static { 1.0 } else { 0.0 });

    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method_with_tokens(name: &str, tokens: &[&str]) -> MethodMetrics {
        let mut m = MethodMetrics::new(name);
        m.tokens = tokens.iter().map(|t| t.to_string()).collect();
        m
    }

    #[test]
    fn vocabulary_preserves_first_appearance_order() {
        let methods = vec![
            method_with_tokens("a", &["login", "user"]),
            method_with_tokens("b", &["user", "token"]),
        ];
        assert_eq!(build_vocabulary(&methods), vec!["login", "user", "token"]);
    }

    #[test]
    fn matrix_has_stable_shape() {
        let methods = vec![
            method_with_tokens("a", &["login", "user"]),
            method_with_tokens("b", &["token"]),
        ];
        let vocabulary = build_vocabulary(&methods);
        let matrix = build_feature_matrix(&methods, &vocabulary);

        assert_eq!(matrix.len(), 2);
        for row in &matrix {
            assert_eq!(row.len(), vocabulary.len() + STRUCTURAL_FEATURES);
        }
    }

    #[test]
    fn tf_weights_normalize_by_bag_size() {
        let methods = vec![method_with_tokens("a", &["login", "user"])];
        let vocabulary = build_vocabulary(&methods);
        let matrix = build_feature_matrix(&methods, &vocabulary);

        assert!((matrix[0][0] - 0.5).abs() < 1e-9);
        assert!((matrix[0][1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn structural_features_are_normalized() {
        let mut m = method_with_tokens("a", &[]);
        m.line_count = 50;
        m.cyclomatic = 10;
        m.is_public = true;
        let matrix = build_feature_matrix(std::slice::from_ref(&m), &[]);

        assert_eq!(matrix[0].len(), STRUCTURAL_FEATURES);
        assert!((matrix[0][0] - 0.5).abs() < 1e-9);
        assert!((matrix[0][1] - 0.5).abs() < 1e-9);
        assert_eq!(matrix[0][4], 1.0);
        assert_eq!(matrix[0][5], 0.0);
    }
}
