//! JavaScript / TypeScript parser built on tree-sitter.
//!
//! One implementation serves both grammars; the registry registers it
//! twice with different extension sets. Getters and setters count as
//! properties, `field_definition` members as fields. Broken regions of a
//! file surface as tree-sitter ERROR nodes, so the recognizable classes
//! are still extracted.

use anyhow::Context;
use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::{Node, Parser};

use super::tokens::{count_code_lines, token_bag};
use super::{dependency_hints, ClassParser};
use crate::core::errors::{Error, Result};
use crate::core::{ClassMetrics, Language, MethodMetrics};

pub struct JsParser {
    language: Language,
}

impl JsParser {
    pub fn javascript() -> Self {
        Self {
            language: Language::JavaScript,
        }
    }

    pub fn typescript() -> Self {
        Self {
            language: Language::TypeScript,
        }
    }

    fn grammar(&self) -> tree_sitter::Language {
        match self.language {
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            _ => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl ClassParser for JsParser {
    fn parse_source(&self, source: &str, path: &Path) -> Result<Vec<ClassMetrics>> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar())
            .context("failed to load grammar")
            .map_err(Error::External)?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(path, format!("unparseable {} file", self.language)))?;

        let root = tree.root_node();
        let imports = collect_imports(root, source);

        let mut classes = Vec::new();
        collect_classes(root, source, path, &imports, &mut classes);
        Ok(classes)
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self.language {
            Language::TypeScript => &["ts", "tsx"],
            _ => &["js", "jsx", "mjs", "cjs"],
        }
    }

    fn language(&self) -> Language {
        self.language
    }
}

fn collect_classes(
    node: Node,
    source: &str,
    path: &Path,
    imports: &[String],
    classes: &mut Vec<ClassMetrics>,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "class_declaration" {
            if let Some(class) = extract_class(child, source, path, imports) {
                classes.push(class);
            }
        }
        collect_classes(child, source, path, imports, classes);
    }
}

fn extract_class(
    node: Node,
    source: &str,
    path: &Path,
    imports: &[String],
) -> Option<ClassMetrics> {
    let name = node.child_by_field_name("name")?.utf8_text(source.as_bytes()).ok()?;
    let body = node.child_by_field_name("body")?;

    let mut methods = Vec::new();
    let mut property_count = 0usize;
    let mut field_count = 0usize;

    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        match member.kind() {
            "method_definition" => {
                if is_accessor(member) {
                    property_count += 1;
                } else if let Some(method) = extract_method(member, source) {
                    methods.push(method);
                }
            }
            "field_definition" | "public_field_definition" => field_count += 1,
            _ => {}
        }
    }

    let text = node.utf8_text(source.as_bytes()).ok()?;
    let mut class = ClassMetrics::new(name, path);
    class.line_count = count_code_lines(text, "//");
    class.property_count = property_count;
    class.field_count = field_count;
    class.dependencies = dependency_hints(imports, &methods);
    Some(class.with_methods(methods))
}

fn extract_method(node: Node, source: &str) -> Option<MethodMetrics> {
    let name = node.child_by_field_name("name")?.utf8_text(source.as_bytes()).ok()?;

    let mut metrics = MethodMetrics::new(name);
    let text = node.utf8_text(source.as_bytes()).ok()?;
    metrics.line_count = count_code_lines(text, "//");
    metrics.is_static = has_keyword_child(node, "static");
    metrics.is_async = has_keyword_child(node, "async");
    metrics.is_public = is_public_member(node, name, source);

    metrics.return_type = node
        .child_by_field_name("return_type")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .map(|t| t.trim_start_matches(':').trim().to_string())
        .unwrap_or_default();

    let mut parameter_types = Vec::new();
    if let Some(parameters) = node.child_by_field_name("parameters") {
        extract_parameters(parameters, source, &mut metrics.parameters, &mut parameter_types);
    }

    let mut walker = BodyWalker::default();
    if let Some(body) = node.child_by_field_name("body") {
        walker.walk(body, source);
    }
    metrics.cyclomatic = 1 + walker.decision_points;
    metrics.called_methods = walker.called_methods;
    metrics.accessed_identifiers = walker.accessed_identifiers;

    let token_sources: Vec<&str> = std::iter::once(metrics.name.as_str())
        .chain(parameter_types.iter().map(String::as_str))
        .chain(metrics.called_methods.iter().map(String::as_str))
        .collect();
    metrics.tokens = token_bag(token_sources);

    Some(metrics)
}

fn extract_parameters(
    parameters: Node,
    source: &str,
    names: &mut Vec<String>,
    types: &mut Vec<String>,
) {
    let mut cursor = parameters.walk();
    for parameter in parameters.named_children(&mut cursor) {
        match parameter.kind() {
            "identifier" | "object_pattern" | "array_pattern" | "assignment_pattern" => {
                names.push(parameter_name(parameter, source));
            }
            // A rest parameter counts as one
            "rest_parameter" => names.push(parameter_name(parameter, source)),
            // TypeScript wraps the pattern and carries a type annotation
            "required_parameter" | "optional_parameter" => {
                names.push(parameter_name(parameter, source));
                if let Some(annotation) = parameter.child_by_field_name("type") {
                    if let Ok(text) = annotation.utf8_text(source.as_bytes()) {
                        types.push(text.trim_start_matches(':').trim().to_string());
                    }
                }
            }
            _ => {}
        }
    }
}

fn parameter_name(parameter: Node, source: &str) -> String {
    if let Some(pattern) = parameter.child_by_field_name("pattern") {
        return pattern
            .utf8_text(source.as_bytes())
            .unwrap_or_default()
            .to_string();
    }
    parameter
        .utf8_text(source.as_bytes())
        .unwrap_or_default()
        .to_string()
}

#[derive(Default)]
struct BodyWalker {
    decision_points: u32,
    called_methods: BTreeSet<String>,
    accessed_identifiers: BTreeSet<String>,
}

impl BodyWalker {
    fn walk(&mut self, node: Node, source: &str) {
        match node.kind() {
            "if_statement" | "while_statement" | "do_statement" | "for_statement"
            | "for_in_statement" | "switch_case" | "catch_clause" | "ternary_expression" => {
                self.decision_points += 1;
            }
            "binary_expression" => {
                if let Some(operator) = node.child_by_field_name("operator") {
                    let text = operator.utf8_text(source.as_bytes()).unwrap_or("");
                    if text == "&&" || text == "||" {
                        self.decision_points += 1;
                    }
                }
            }
            "call_expression" => {
                if let Some(function) = node.child_by_field_name("function") {
                    if let Ok(text) = function.utf8_text(source.as_bytes()) {
                        self.called_methods.insert(text.to_string());
                    }
                }
            }
            "identifier" | "property_identifier" | "private_property_identifier"
            | "shorthand_property_identifier" => {
                if let Ok(text) = node.utf8_text(source.as_bytes()) {
                    self.accessed_identifiers.insert(text.to_string());
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child, source);
        }
    }
}

fn is_accessor(node: Node) -> bool {
    has_keyword_child(node, "get") || has_keyword_child(node, "set")
}

fn has_keyword_child(node: Node, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(|child| child.kind() == keyword);
    result
}

fn is_public_member(node: Node, name: &str, source: &str) -> bool {
    if name.starts_with('#') || name.starts_with('_') {
        return false;
    }
    let mut cursor = node.walk();
    let result = !node.children(&mut cursor).any(|child| {
        child.kind() == "accessibility_modifier"
            && matches!(
                child.utf8_text(source.as_bytes()).unwrap_or(""),
                "private" | "protected"
            )
    });
    result
}

fn collect_imports(root: Node, source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "import_statement" {
            if let Some(module) = child.child_by_field_name("source") {
                if let Ok(text) = module.utf8_text(source.as_bytes()) {
                    imports.push(text.trim_matches(|c| c == '"' || c == '\'').to_string());
                }
            }
        }
    }
    imports
}
