//! Python parser built on rustpython-parser.
//!
//! Classes are `class` statements at any nesting depth. `@property`
//! methods (and setter/getter/deleter companions) count as properties
//! rather than methods; `@staticmethod` and `@classmethod` mark a method
//! static. Line counts come from the AST byte ranges sliced out of the
//! source.

use rustpython_parser::{ast, Mode};
use std::collections::BTreeSet;
use std::path::Path;

use super::tokens::{count_code_lines, token_bag};
use super::{dependency_hints, ClassParser};
use crate::core::errors::{Error, Result};
use crate::core::{ClassMetrics, Language, MethodMetrics};

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassParser for PythonParser {
    fn parse_source(&self, source: &str, path: &Path) -> Result<Vec<ClassMetrics>> {
        let module = rustpython_parser::parse(source, Mode::Module, "<module>")
            .map_err(|e| Error::parse(path, e.to_string()))?;

        let ast::Mod::Module(module) = module else {
            return Ok(Vec::new());
        };

        let imports = collect_imports(&module.body);
        let mut classes = Vec::new();
        collect_classes(&module.body, source, path, &imports, &mut classes);
        Ok(classes)
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

/// Classes can appear at any nesting depth (inside functions, conditionals,
/// other classes), so the search recurses through statement bodies.
fn collect_classes(
    statements: &[ast::Stmt],
    source: &str,
    path: &Path,
    imports: &[String],
    classes: &mut Vec<ClassMetrics>,
) {
    for statement in statements {
        if let ast::Stmt::ClassDef(class_def) = statement {
            classes.push(extract_class(class_def, source, path, imports));
        }
        for body in nested_bodies(statement) {
            collect_classes(body, source, path, imports, classes);
        }
    }
}

fn nested_bodies(statement: &ast::Stmt) -> Vec<&[ast::Stmt]> {
    match statement {
        ast::Stmt::ClassDef(inner) => vec![&inner.body],
        ast::Stmt::FunctionDef(inner) => vec![&inner.body],
        ast::Stmt::AsyncFunctionDef(inner) => vec![&inner.body],
        ast::Stmt::If(inner) => vec![&inner.body, &inner.orelse],
        ast::Stmt::While(inner) => vec![&inner.body, &inner.orelse],
        ast::Stmt::For(inner) => vec![&inner.body, &inner.orelse],
        ast::Stmt::AsyncFor(inner) => vec![&inner.body, &inner.orelse],
        ast::Stmt::With(inner) => vec![&inner.body],
        ast::Stmt::AsyncWith(inner) => vec![&inner.body],
        ast::Stmt::Try(inner) => vec![&inner.body, &inner.orelse, &inner.finalbody],
        _ => Vec::new(),
    }
}

fn extract_class(
    class_def: &ast::StmtClassDef,
    source: &str,
    path: &Path,
    imports: &[String],
) -> ClassMetrics {
    let mut methods = Vec::new();
    let mut property_count = 0usize;
    let mut field_count = 0usize;

    for statement in &class_def.body {
        match statement {
            ast::Stmt::FunctionDef(func) => {
                if is_property(&func.decorator_list) {
                    property_count += 1;
                } else {
                    if func.name.as_str() == "__init__" {
                        field_count += count_self_assignments(&func.body);
                    }
                    methods.push(extract_method(
                        func.name.as_str(),
                        &func.args,
                        &func.body,
                        func.returns.as_deref(),
                        &func.decorator_list,
                        false,
                        span_code_lines(source, func.range.start().to_usize(), func.range.end().to_usize()),
                    ));
                }
            }
            ast::Stmt::AsyncFunctionDef(func) => {
                if is_property(&func.decorator_list) {
                    property_count += 1;
                } else {
                    methods.push(extract_method(
                        func.name.as_str(),
                        &func.args,
                        &func.body,
                        func.returns.as_deref(),
                        &func.decorator_list,
                        true,
                        span_code_lines(source, func.range.start().to_usize(), func.range.end().to_usize()),
                    ));
                }
            }
            // Class-level attribute declarations
            ast::Stmt::Assign(_) | ast::Stmt::AnnAssign(_) => field_count += 1,
            _ => {}
        }
    }

    let mut class = ClassMetrics::new(class_def.name.to_string(), path);
    class.line_count = span_code_lines(
        source,
        class_def.range.start().to_usize(),
        class_def.range.end().to_usize(),
    );
    class.property_count = property_count;
    class.field_count = field_count;
    class.dependencies = dependency_hints(imports, &methods);
    class.with_methods(methods)
}

#[allow(clippy::too_many_arguments)]
fn extract_method(
    name: &str,
    args: &ast::Arguments,
    body: &[ast::Stmt],
    returns: Option<&ast::Expr>,
    decorators: &[ast::Expr],
    is_async: bool,
    line_count: usize,
) -> MethodMetrics {
    let mut metrics = MethodMetrics::new(name);
    metrics.line_count = line_count;
    metrics.is_async = is_async;
    metrics.is_static = has_decorator(decorators, &["staticmethod", "classmethod"]);
    metrics.is_public = !name.starts_with('_');
    metrics.return_type = returns.map(expr_designator).unwrap_or_else(|| "None".into());

    let mut parameter_types = Vec::new();
    let positional = args.posonlyargs.iter().chain(args.args.iter());
    for (index, arg) in positional.enumerate() {
        let arg_name = arg.def.arg.as_str();
        // The self/cls receiver is not a formal parameter
        if index == 0 && matches!(arg_name, "self" | "cls") {
            continue;
        }
        metrics.parameters.push(arg_name.to_string());
        if let Some(annotation) = arg.def.annotation.as_deref() {
            parameter_types.push(expr_designator(annotation));
        }
    }
    for arg in &args.kwonlyargs {
        metrics.parameters.push(arg.def.arg.to_string());
        if let Some(annotation) = arg.def.annotation.as_deref() {
            parameter_types.push(expr_designator(annotation));
        }
    }
    // Variadic and keyword-variadic parameters each count as one
    if let Some(vararg) = &args.vararg {
        metrics.parameters.push(format!("*{}", vararg.arg));
    }
    if let Some(kwarg) = &args.kwarg {
        metrics.parameters.push(format!("**{}", kwarg.arg));
    }

    let mut walker = BodyWalker::default();
    walker.walk_body(body);
    metrics.cyclomatic = 1 + walker.decision_points;
    metrics.called_methods = walker.called_methods;
    metrics.accessed_identifiers = walker.accessed_identifiers;

    let token_sources: Vec<&str> = std::iter::once(name)
        .chain(parameter_types.iter().map(String::as_str))
        .chain(metrics.called_methods.iter().map(String::as_str))
        .collect();
    metrics.tokens = token_bag(token_sources);

    metrics
}

/// Recursive statement/expression walk counting decision points and
/// recording call targets and identifier references.
#[derive(Default)]
struct BodyWalker {
    decision_points: u32,
    called_methods: BTreeSet<String>,
    accessed_identifiers: BTreeSet<String>,
}

impl BodyWalker {
    fn walk_body(&mut self, body: &[ast::Stmt]) {
        for statement in body {
            self.walk_stmt(statement);
        }
    }

    fn walk_stmt(&mut self, statement: &ast::Stmt) {
        use ast::Stmt::*;
        match statement {
            If(inner) => {
                self.decision_points += 1;
                self.walk_expr(&inner.test);
                self.walk_body(&inner.body);
                self.walk_body(&inner.orelse);
            }
            While(inner) => {
                self.decision_points += 1;
                self.walk_expr(&inner.test);
                self.walk_body(&inner.body);
                self.walk_body(&inner.orelse);
            }
            For(inner) => {
                self.decision_points += 1;
                self.walk_expr(&inner.target);
                self.walk_expr(&inner.iter);
                self.walk_body(&inner.body);
                self.walk_body(&inner.orelse);
            }
            AsyncFor(inner) => {
                self.decision_points += 1;
                self.walk_expr(&inner.target);
                self.walk_expr(&inner.iter);
                self.walk_body(&inner.body);
                self.walk_body(&inner.orelse);
            }
            Try(inner) => {
                self.walk_body(&inner.body);
                for handler in &inner.handlers {
                    let ast::ExceptHandler::ExceptHandler(handler) = handler;
                    self.decision_points += 1;
                    self.walk_body(&handler.body);
                }
                self.walk_body(&inner.orelse);
                self.walk_body(&inner.finalbody);
            }
            TryStar(inner) => {
                self.walk_body(&inner.body);
                for handler in &inner.handlers {
                    let ast::ExceptHandler::ExceptHandler(handler) = handler;
                    self.decision_points += 1;
                    self.walk_body(&handler.body);
                }
                self.walk_body(&inner.orelse);
                self.walk_body(&inner.finalbody);
            }
            Match(inner) => {
                self.walk_expr(&inner.subject);
                for case in &inner.cases {
                    self.decision_points += 1;
                    if let Some(guard) = &case.guard {
                        self.walk_expr(guard);
                    }
                    self.walk_body(&case.body);
                }
            }
            With(inner) => {
                for item in &inner.items {
                    self.walk_expr(&item.context_expr);
                }
                self.walk_body(&inner.body);
            }
            AsyncWith(inner) => {
                for item in &inner.items {
                    self.walk_expr(&item.context_expr);
                }
                self.walk_body(&inner.body);
            }
            FunctionDef(inner) => self.walk_body(&inner.body),
            AsyncFunctionDef(inner) => self.walk_body(&inner.body),
            ClassDef(inner) => self.walk_body(&inner.body),
            Return(inner) => {
                if let Some(value) = &inner.value {
                    self.walk_expr(value);
                }
            }
            Assign(inner) => {
                for target in &inner.targets {
                    self.walk_expr(target);
                }
                self.walk_expr(&inner.value);
            }
            AnnAssign(inner) => {
                self.walk_expr(&inner.target);
                if let Some(value) = &inner.value {
                    self.walk_expr(value);
                }
            }
            AugAssign(inner) => {
                self.walk_expr(&inner.target);
                self.walk_expr(&inner.value);
            }
            Expr(inner) => self.walk_expr(&inner.value),
            Raise(inner) => {
                if let Some(exc) = &inner.exc {
                    self.walk_expr(exc);
                }
            }
            Assert(inner) => {
                self.walk_expr(&inner.test);
                if let Some(msg) = &inner.msg {
                    self.walk_expr(msg);
                }
            }
            Delete(inner) => {
                for target in &inner.targets {
                    self.walk_expr(target);
                }
            }
            _ => {}
        }
    }

    fn walk_expr(&mut self, expression: &ast::Expr) {
        use ast::Expr::*;
        match expression {
            BoolOp(inner) => {
                // `a and b and c` has two short-circuit points
                self.decision_points += inner.values.len().saturating_sub(1) as u32;
                for value in &inner.values {
                    self.walk_expr(value);
                }
            }
            IfExp(inner) => {
                self.decision_points += 1;
                self.walk_expr(&inner.test);
                self.walk_expr(&inner.body);
                self.walk_expr(&inner.orelse);
            }
            Call(inner) => {
                self.called_methods.insert(call_target(&inner.func));
                self.walk_expr(&inner.func);
                for arg in &inner.args {
                    self.walk_expr(arg);
                }
                for keyword in &inner.keywords {
                    self.walk_expr(&keyword.value);
                }
            }
            Name(inner) => {
                self.accessed_identifiers.insert(inner.id.to_string());
            }
            Attribute(inner) => {
                self.accessed_identifiers.insert(inner.attr.to_string());
                self.walk_expr(&inner.value);
            }
            ListComp(inner) => {
                self.walk_comprehension(&inner.generators);
                self.walk_expr(&inner.elt);
            }
            SetComp(inner) => {
                self.walk_comprehension(&inner.generators);
                self.walk_expr(&inner.elt);
            }
            GeneratorExp(inner) => {
                self.walk_comprehension(&inner.generators);
                self.walk_expr(&inner.elt);
            }
            DictComp(inner) => {
                self.walk_comprehension(&inner.generators);
                self.walk_expr(&inner.key);
                self.walk_expr(&inner.value);
            }
            BinOp(inner) => {
                self.walk_expr(&inner.left);
                self.walk_expr(&inner.right);
            }
            UnaryOp(inner) => self.walk_expr(&inner.operand),
            Compare(inner) => {
                self.walk_expr(&inner.left);
                for comparator in &inner.comparators {
                    self.walk_expr(comparator);
                }
            }
            Subscript(inner) => {
                self.walk_expr(&inner.value);
                self.walk_expr(&inner.slice);
            }
            Tuple(inner) => {
                for element in &inner.elts {
                    self.walk_expr(element);
                }
            }
            List(inner) => {
                for element in &inner.elts {
                    self.walk_expr(element);
                }
            }
            Set(inner) => {
                for element in &inner.elts {
                    self.walk_expr(element);
                }
            }
            Dict(inner) => {
                for key in inner.keys.iter().flatten() {
                    self.walk_expr(key);
                }
                for value in &inner.values {
                    self.walk_expr(value);
                }
            }
            Starred(inner) => self.walk_expr(&inner.value),
            Await(inner) => self.walk_expr(&inner.value),
            Yield(inner) => {
                if let Some(value) = &inner.value {
                    self.walk_expr(value);
                }
            }
            YieldFrom(inner) => self.walk_expr(&inner.value),
            Lambda(inner) => self.walk_expr(&inner.body),
            FormattedValue(inner) => self.walk_expr(&inner.value),
            JoinedStr(inner) => {
                for value in &inner.values {
                    self.walk_expr(value);
                }
            }
            Slice(inner) => {
                if let Some(lower) = &inner.lower {
                    self.walk_expr(lower);
                }
                if let Some(upper) = &inner.upper {
                    self.walk_expr(upper);
                }
                if let Some(step) = &inner.step {
                    self.walk_expr(step);
                }
            }
            NamedExpr(inner) => {
                self.walk_expr(&inner.target);
                self.walk_expr(&inner.value);
            }
            _ => {}
        }
    }

    fn walk_comprehension(&mut self, generators: &[ast::Comprehension]) {
        for generator in generators {
            // Each generator is a loop; each filter is a branch
            self.decision_points += 1 + generator.ifs.len() as u32;
            self.walk_expr(&generator.target);
            self.walk_expr(&generator.iter);
            for filter in &generator.ifs {
                self.walk_expr(filter);
            }
        }
    }
}

/// The callee expression as written, for dotted chains of plain names.
fn call_target(func: &ast::Expr) -> String {
    match func {
        ast::Expr::Name(name) => name.id.to_string(),
        ast::Expr::Attribute(attribute) => match call_target_base(&attribute.value) {
            Some(base) => format!("{base}.{}", attribute.attr),
            None => attribute.attr.to_string(),
        },
        _ => String::from("<expr>"),
    }
}

fn call_target_base(expression: &ast::Expr) -> Option<String> {
    match expression {
        ast::Expr::Name(name) => Some(name.id.to_string()),
        ast::Expr::Attribute(attribute) => {
            let base = call_target_base(&attribute.value)?;
            Some(format!("{base}.{}", attribute.attr))
        }
        _ => None,
    }
}

/// Rough textual designator for annotation expressions.
fn expr_designator(expression: &ast::Expr) -> String {
    match expression {
        ast::Expr::Name(name) => name.id.to_string(),
        ast::Expr::Attribute(_) => call_target(expression),
        ast::Expr::Subscript(subscript) => expr_designator(&subscript.value),
        ast::Expr::Constant(constant) => match &constant.value {
            ast::Constant::Str(s) => s.clone(),
            ast::Constant::None => "None".into(),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

fn is_property(decorators: &[ast::Expr]) -> bool {
    decorators.iter().any(|decorator| match decorator {
        ast::Expr::Name(name) => name.id.as_str() == "property",
        ast::Expr::Attribute(attribute) => {
            matches!(attribute.attr.as_str(), "setter" | "getter" | "deleter")
        }
        _ => false,
    })
}

fn has_decorator(decorators: &[ast::Expr], names: &[&str]) -> bool {
    decorators.iter().any(|decorator| match decorator {
        ast::Expr::Name(name) => names.contains(&name.id.as_str()),
        _ => false,
    })
}

fn count_self_assignments(body: &[ast::Stmt]) -> usize {
    body.iter()
        .filter(|statement| match statement {
            ast::Stmt::Assign(assign) => assign.targets.iter().any(is_self_attribute),
            ast::Stmt::AnnAssign(assign) => is_self_attribute(&assign.target),
            _ => false,
        })
        .count()
}

fn is_self_attribute(expression: &ast::Expr) -> bool {
    match expression {
        ast::Expr::Attribute(attribute) => {
            matches!(attribute.value.as_ref(), ast::Expr::Name(name) if name.id.as_str() == "self")
        }
        _ => false,
    }
}

fn collect_imports(body: &[ast::Stmt]) -> Vec<String> {
    let mut imports = Vec::new();
    for statement in body {
        match statement {
            ast::Stmt::Import(import) => {
                for alias in &import.names {
                    imports.push(alias.name.to_string());
                }
            }
            ast::Stmt::ImportFrom(import) => {
                let module = import
                    .module
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                for alias in &import.names {
                    if module.is_empty() {
                        imports.push(alias.name.to_string());
                    } else {
                        imports.push(format!("{module}.{}", alias.name));
                    }
                }
            }
            _ => {}
        }
    }
    imports
}

/// Code lines inside an AST byte range.
fn span_code_lines(source: &str, start: usize, end: usize) -> usize {
    let start = start.min(source.len());
    let end = end.clamp(start, source.len());
    count_code_lines(&source[start..end], "#")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<ClassMetrics> {
        PythonParser::new()
            .parse_source(source, Path::new("demo.py"))
            .unwrap()
    }

    #[test]
    fn empty_file_yields_no_classes() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn module_level_functions_are_not_classes() {
        assert!(parse("def main():\n    return 0\n").is_empty());
    }

    #[test]
    fn extracts_class_with_methods_and_fields() {
        let classes = parse(
            "class Account:\n\
             \x20   limit = 100\n\
             \x20   def __init__(self, owner):\n\
             \x20       self.owner = owner\n\
             \x20       self.balance = 0\n\
             \x20   def deposit(self, amount):\n\
             \x20       self.balance += amount\n",
        );
        assert_eq!(classes.len(), 1);
        let account = &classes[0];
        assert_eq!(account.name, "Account");
        assert_eq!(account.method_count, 2);
        // class-level `limit` plus self.owner and self.balance
        assert_eq!(account.field_count, 3);
        assert_eq!(account.methods[1].parameters, vec!["amount"]);
    }

    #[test]
    fn straight_line_method_has_complexity_one() {
        let classes = parse(
            "class Calc:\n\
             \x20   def double(self, x):\n\
             \x20       return x * 2\n",
        );
        assert_eq!(classes[0].methods[0].cyclomatic, 1);
    }

    #[test]
    fn branches_and_boolops_add_complexity() {
        let classes = parse(
            "class Calc:\n\
             \x20   def check(self, x, y):\n\
             \x20       if x > 0 and y > 0:\n\
             \x20           return True\n\
             \x20       for i in range(x):\n\
             \x20           print(i)\n\
             \x20       return False\n",
        );
        // base 1 + if + and + for
        assert_eq!(classes[0].methods[0].cyclomatic, 4);
    }

    #[test]
    fn except_handlers_count() {
        let classes = parse(
            "class Loader:\n\
             \x20   def load(self, path):\n\
             \x20       try:\n\
             \x20           return open(path)\n\
             \x20       except OSError:\n\
             \x20           return None\n",
        );
        assert_eq!(classes[0].methods[0].cyclomatic, 2);
    }

    #[test]
    fn decorators_classify_static_and_property() {
        let classes = parse(
            "class Config:\n\
             \x20   @property\n\
             \x20   def path(self):\n\
             \x20       return self._path\n\
             \x20   @staticmethod\n\
             \x20   def default():\n\
             \x20       return Config()\n",
        );
        let config = &classes[0];
        assert_eq!(config.property_count, 1);
        assert_eq!(config.method_count, 1);
        assert!(config.methods[0].is_static);
    }

    #[test]
    fn private_names_are_not_public() {
        let classes = parse(
            "class Vault:\n\
             \x20   def _unlock(self):\n\
             \x20       pass\n\
             \x20   def open(self):\n\
             \x20       self._unlock()\n",
        );
        assert!(!classes[0].methods[0].is_public);
        assert!(classes[0].methods[1].is_public);
        assert!(classes[0].methods[1]
            .called_methods
            .contains("self._unlock"));
    }

    #[test]
    fn variadic_parameters_count_once_each() {
        let classes = parse(
            "class Api:\n\
             \x20   def call(self, route, *args, **kwargs):\n\
             \x20       return route\n",
        );
        assert_eq!(
            classes[0].methods[0].parameters,
            vec!["route", "*args", "**kwargs"]
        );
    }

    #[test]
    fn imports_become_dependency_hints() {
        let classes = parse(
            "import json\n\
             from pathlib import Path\n\
             class Store:\n\
             \x20   def dump(self, data):\n\
             \x20       return json.dumps(data)\n",
        );
        let deps = &classes[0].dependencies;
        assert!(deps.contains(&"json".to_string()));
        assert!(deps.contains(&"pathlib.Path".to_string()));
    }

    #[test]
    fn nested_classes_are_found() {
        let classes = parse(
            "class Outer:\n\
             \x20   class Inner:\n\
             \x20       def ping(self):\n\
             \x20           return 1\n",
        );
        let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Outer", "Inner"]);
    }
}
