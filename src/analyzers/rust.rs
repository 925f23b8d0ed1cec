//! Rust parser built on syn.
//!
//! A "class" is a struct or enum together with every `impl` block for it
//! in the same file; multiple impl blocks merge into one class. Free
//! functions are not classes and do not contribute to file verdicts.

use quote::ToTokens;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use syn::spanned::Spanned;
use syn::{visit::Visit, Expr, FnArg, ImplItem, Item, ReturnType, Visibility};

use super::tokens::{count_code_lines, token_bag};
use super::{dependency_hints, ClassParser};
use crate::core::errors::{Error, Result};
use crate::core::{ClassMetrics, Language, MethodMetrics};

pub struct RustParser;

impl RustParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassParser for RustParser {
    fn parse_source(&self, source: &str, path: &Path) -> Result<Vec<ClassMetrics>> {
        let file =
            syn::parse_file(source).map_err(|e| Error::parse(path, e.to_string()))?;
        Ok(extract_classes(&file, source, path))
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn language(&self) -> Language {
        Language::Rust
    }
}

struct TypeDecl {
    field_count: usize,
    line_count: usize,
}

fn extract_classes(file: &syn::File, source: &str, path: &Path) -> Vec<ClassMetrics> {
    let imports = collect_imports(&file.items);

    // Declaration pass: struct/enum facts, keyed by type name
    let mut declarations: HashMap<String, TypeDecl> = HashMap::new();
    for item in &file.items {
        match item {
            Item::Struct(item_struct) => {
                declarations.insert(
                    item_struct.ident.to_string(),
                    TypeDecl {
                        field_count: item_struct.fields.len(),
                        line_count: item_code_lines(source, item.span()),
                    },
                );
            }
            Item::Enum(item_enum) => {
                declarations.insert(
                    item_enum.ident.to_string(),
                    TypeDecl {
                        field_count: 0,
                        line_count: item_code_lines(source, item.span()),
                    },
                );
            }
            _ => {}
        }
    }

    // Impl pass: merge method sets per self type, preserving impl order
    let mut class_order: Vec<String> = Vec::new();
    let mut methods_by_type: HashMap<String, Vec<MethodMetrics>> = HashMap::new();
    let mut impl_lines: HashMap<String, usize> = HashMap::new();

    for item in &file.items {
        let Item::Impl(item_impl) = item else {
            continue;
        };
        let Some(type_name) = self_type_name(&item_impl.self_ty) else {
            continue;
        };

        if !methods_by_type.contains_key(&type_name) {
            class_order.push(type_name.clone());
        }
        *impl_lines.entry(type_name.clone()).or_insert(0) +=
            item_code_lines(source, item.span());

        let methods = methods_by_type.entry(type_name).or_default();
        for impl_item in &item_impl.items {
            if let ImplItem::Fn(method) = impl_item {
                methods.push(extract_method(method, source));
            }
        }
    }

    class_order
        .into_iter()
        .map(|type_name| {
            let methods = methods_by_type.remove(&type_name).unwrap_or_default();
            let decl = declarations.get(&type_name);

            let mut class = ClassMetrics::new(type_name.clone(), path);
            class.field_count = decl.map(|d| d.field_count).unwrap_or(0);
            class.line_count = decl.map(|d| d.line_count).unwrap_or(0)
                + impl_lines.get(&type_name).copied().unwrap_or(0);
            class.dependencies = dependency_hints(&imports, &methods);
            class.with_methods(methods)
        })
        .collect()
}

fn extract_method(method: &syn::ImplItemFn, source: &str) -> MethodMetrics {
    let mut metrics = MethodMetrics::new(method.sig.ident.to_string());
    metrics.line_count = item_code_lines(source, method.span());
    metrics.is_public = matches!(method.vis, Visibility::Public(_));
    metrics.is_async = method.sig.asyncness.is_some();
    metrics.is_static = !method
        .sig
        .inputs
        .iter()
        .any(|arg| matches!(arg, FnArg::Receiver(_)));

    let mut parameter_types = Vec::new();
    for (index, input) in method.sig.inputs.iter().enumerate() {
        if let FnArg::Typed(pat_type) = input {
            let name = match pat_type.pat.as_ref() {
                syn::Pat::Ident(pat_ident) => pat_ident.ident.to_string(),
                _ => format!("arg{index}"),
            };
            metrics.parameters.push(name);
            parameter_types.push(render_tokens(&pat_type.ty));
        }
    }

    metrics.return_type = match &method.sig.output {
        ReturnType::Default => "()".to_string(),
        ReturnType::Type(_, ty) => render_tokens(ty),
    };

    let mut visitor = BodyVisitor::default();
    visitor.visit_block(&method.block);
    metrics.cyclomatic = visitor.complexity;
    metrics.called_methods = visitor.called_methods;
    metrics.accessed_identifiers = visitor.accessed_identifiers;

    let token_sources: Vec<&str> = std::iter::once(metrics.name.as_str())
        .chain(parameter_types.iter().map(String::as_str))
        .chain(metrics.called_methods.iter().map(String::as_str))
        .collect();
    metrics.tokens = token_bag(token_sources);

    metrics
}

/// Counts decision points and records call targets and identifier
/// references in one pass over a method body.
#[derive(Default)]
struct BodyVisitor {
    complexity: u32,
    called_methods: BTreeSet<String>,
    accessed_identifiers: BTreeSet<String>,
}

impl<'ast> Visit<'ast> for BodyVisitor {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::If(_) | Expr::While(_) | Expr::ForLoop(_) | Expr::Loop(_) => {
                self.complexity += 1;
            }
            Expr::Match(expr_match) => {
                self.complexity += expr_match.arms.len() as u32;
            }
            Expr::Binary(binary) if is_short_circuit(&binary.op) => {
                self.complexity += 1;
            }
            // `?` is the catch-clause analog
            Expr::Try(_) => self.complexity += 1,
            Expr::Call(call) => {
                self.called_methods.insert(render_callee(&call.func));
            }
            Expr::MethodCall(method_call) => {
                self.called_methods.insert(method_call.method.to_string());
            }
            Expr::Path(expr_path) => {
                for segment in &expr_path.path.segments {
                    self.accessed_identifiers.insert(segment.ident.to_string());
                }
            }
            Expr::Field(field) => {
                if let syn::Member::Named(ident) = &field.member {
                    self.accessed_identifiers.insert(ident.to_string());
                }
            }
            _ => {}
        }
        syn::visit::visit_expr(self, expr);
    }
}

fn is_short_circuit(op: &syn::BinOp) -> bool {
    matches!(op, syn::BinOp::And(_) | syn::BinOp::Or(_))
}

fn self_type_name(self_ty: &syn::Type) -> Option<String> {
    match self_ty {
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

fn render_callee(func: &Expr) -> String {
    match func {
        Expr::Path(expr_path) => expr_path
            .path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>()
            .join("::"),
        other => render_tokens(other),
    }
}

/// Token-stream rendering without the spaces `ToTokens` inserts.
fn render_tokens(tokens: &impl ToTokens) -> String {
    tokens.to_token_stream().to_string().replace(' ', "")
}

fn collect_imports(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Item::Use(item_use) => Some(render_tokens(&item_use.tree)),
            _ => None,
        })
        .collect()
}

/// Code lines covered by a span, using proc-macro2 line locations.
fn item_code_lines(source: &str, span: proc_macro2::Span) -> usize {
    let start = span.start().line;
    let end = span.end().line;
    if start == 0 || end < start {
        return 0;
    }

    let slice: Vec<&str> = source
        .lines()
        .skip(start - 1)
        .take(end - start + 1)
        .collect();
    count_code_lines(&slice.join("\n"), "//")
}
