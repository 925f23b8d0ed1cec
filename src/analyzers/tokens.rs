//! Identifier tokenization and code-line counting shared by all parsers.
//!
//! Token splitting feeds the clustering feature vectors, so its semantics
//! are pinned by tests: split before every interior capital and on any
//! non-word character, lowercase the pieces, drop pieces of length <= 2.

/// Split a camelCase / PascalCase / snake_case identifier into lowercased
/// fragments, discarding fragments of length <= 2.
pub fn split_identifier(identifier: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();

    for ch in identifier.chars() {
        if !ch.is_alphanumeric() {
            push_fragment(&mut fragments, &mut current);
        } else if ch.is_uppercase() && !current.is_empty() {
            push_fragment(&mut fragments, &mut current);
            current.push(ch);
        } else {
            current.push(ch);
        }
    }
    push_fragment(&mut fragments, &mut current);

    fragments
}

fn push_fragment(fragments: &mut Vec<String>, current: &mut String) {
    if current.len() > 2 {
        fragments.push(current.to_lowercase());
    }
    current.clear();
}

/// Build a deduplicated token bag in first-appearance order from raw
/// identifier sources (method name, parameter types, call targets).
pub fn token_bag<'a>(sources: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut bag = Vec::new();
    for source in sources {
        for fragment in split_identifier(source) {
            if seen.insert(fragment.clone()) {
                bag.push(fragment);
            }
        }
    }
    bag
}

/// Count lines that, after trimming, are non-empty and do not start with
/// the language's single-line comment marker.
pub fn count_code_lines(source: &str, comment_marker: &str) -> usize {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(comment_marker))
        .count()
}

/// Whether an identifier is a capitalized reference (a dependency hint).
pub fn is_capitalized(identifier: &str) -> bool {
    identifier.chars().next().is_some_and(char::is_uppercase)
}
