//! tree-sitter front end.
//!
//! Parses Python source and converts the concrete syntax tree into an owned
//! [`Declaration`] tree:
//!
//! - `block` bodies and `decorated_definition` wrappers are transparent
//! - definitions inside control flow (`if`, `try`, `with`, ...) are not declarations
//! - a docstring is the first statement of a body when it is a plain string literal

use std::path::Path;
use std::rc::Rc;

use tree_sitter::{Node, Parser};
use yaarg_generator::{GenerateError, LoadError};

use crate::tree::{Class, Declaration, Function, Module, Parameter};

/// Reusable Python parser.
pub(crate) struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a parser with the Python grammar loaded.
    pub(crate) fn new() -> Result<Self, LoadError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|err| LoadError(format!("cannot load Python grammar: {err}")))?;
        Ok(Self { parser })
    }

    /// Parse `source` into a module declaration.
    ///
    /// Syntax errors are tolerated: whatever the parser recovered is kept and
    /// a warning is logged.
    pub(crate) fn parse(&mut self, source: &str, path: &Path) -> Result<Declaration, GenerateError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| GenerateError::Parse {
                path: path.to_path_buf(),
                message: "parser produced no syntax tree".to_owned(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::warn!(
                path = %path.display(),
                "Source has syntax errors, documenting recovered declarations"
            );
        }

        let builder = Builder { source };
        Ok(Declaration::Module(Module {
            doc: builder.docstring(root),
            children: builder.declarations(root),
        }))
    }
}

struct Builder<'s> {
    source: &'s str,
}

impl Builder<'_> {
    fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn declarations(&self, container: Node<'_>) -> Vec<Rc<Declaration>> {
        let mut declarations = Vec::new();
        self.collect(container, &mut declarations);
        declarations
    }

    fn collect(&self, node: Node<'_>, out: &mut Vec<Rc<Declaration>>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "block" => self.collect(child, out),
                "decorated_definition" => {
                    let decorators = self.decorators(child);
                    if let Some(definition) = child.child_by_field_name("definition")
                        && let Some(declaration) = self.definition(definition, decorators)
                    {
                        out.push(Rc::new(declaration));
                    }
                }
                _ => {
                    if let Some(declaration) = self.definition(child, Vec::new()) {
                        out.push(Rc::new(declaration));
                    }
                }
            }
        }
    }

    fn definition(&self, node: Node<'_>, decorators: Vec<String>) -> Option<Declaration> {
        match node.kind() {
            "class_definition" => Some(Declaration::Class(self.class(node, decorators))),
            "function_definition" => Some(Declaration::Function(self.function(node, decorators))),
            _ => None,
        }
    }

    fn class(&self, node: Node<'_>, decorators: Vec<String>) -> Class {
        let body = node.child_by_field_name("body");
        Class {
            name: self.field_text(node, "name").unwrap_or_default(),
            doc: body.and_then(|body| self.docstring(body)),
            decorators,
            children: body.map(|body| self.declarations(body)).unwrap_or_default(),
        }
    }

    fn function(&self, node: Node<'_>, decorators: Vec<String>) -> Function {
        let body = node.child_by_field_name("body");
        Function {
            name: self.field_text(node, "name").unwrap_or_default(),
            doc: body.and_then(|body| self.docstring(body)),
            decorators,
            params: node
                .child_by_field_name("parameters")
                .map(|params| self.parameters(params))
                .unwrap_or_default(),
            returns: node
                .child_by_field_name("return_type")
                .map(|annotation| collapse(self.text(annotation))),
            children: body.map(|body| self.declarations(body)).unwrap_or_default(),
        }
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|child| collapse(self.text(child)))
    }

    fn decorators(&self, node: Node<'_>) -> Vec<String> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .map(|child| collapse(self.text(child)))
            .collect()
    }

    fn docstring(&self, body: Node<'_>) -> Option<String> {
        let mut cursor = body.walk();
        let first = body
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment")?;

        if first.kind() != "expression_statement" || first.named_child_count() != 1 {
            return None;
        }
        let literal = first.named_child(0)?;
        if literal.kind() != "string" {
            return None;
        }

        string_payload(self.text(literal)).map(|payload| cleandoc(&payload))
    }

    fn parameters(&self, node: Node<'_>) -> Vec<Parameter> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter_map(|child| self.parameter(child))
            .collect()
    }

    fn parameter(&self, node: Node<'_>) -> Option<Parameter> {
        match node.kind() {
            "identifier" => Some(Parameter::named("", self.text(node), None, None)),
            "list_splat_pattern" => Some(self.splat("*", node, None)),
            "dictionary_splat_pattern" => Some(self.splat("**", node, None)),
            "keyword_separator" => Some(Parameter::separator("*")),
            "positional_separator" => Some(Parameter::separator("/")),
            "typed_parameter" => {
                let annotation = self.field_text(node, "type");
                let target = node.named_child(0)?;
                match target.kind() {
                    "list_splat_pattern" => Some(self.splat("*", target, annotation)),
                    "dictionary_splat_pattern" => Some(self.splat("**", target, annotation)),
                    _ => Some(Parameter::named("", self.text(target), annotation, None)),
                }
            }
            "default_parameter" | "typed_default_parameter" => Some(Parameter::named(
                "",
                self.field_text(node, "name")?,
                self.field_text(node, "type"),
                self.field_text(node, "value"),
            )),
            _ => None,
        }
    }

    fn splat(&self, prefix: &str, node: Node<'_>, annotation: Option<String>) -> Parameter {
        let name = self.text(node).trim_start_matches('*').trim();
        if name.is_empty() {
            Parameter::separator(prefix)
        } else {
            Parameter::named(prefix, name, annotation, None)
        }
    }
}

/// Collapse multi-line source text onto one line.
///
/// Lines are joined with one space, except directly inside brackets.
fn collapse(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let after_open = collapsed.ends_with(['(', '[', '{']);
        let before_close = line.starts_with([')', ']', '}']);
        if !collapsed.is_empty() && !after_open && !before_close {
            collapsed.push(' ');
        }
        collapsed.push_str(line);
    }
    collapsed
}

/// Text between the quotes of a string literal, escapes left as written.
///
/// Byte and f-string literals are not docstrings.
fn string_payload(literal: &str) -> Option<String> {
    let quote_start = literal.find(['"', '\''])?;
    let (prefix, quoted) = literal.split_at(quote_start);
    if prefix
        .chars()
        .any(|c| matches!(c.to_ascii_lowercase(), 'b' | 'f'))
    {
        return None;
    }

    ["\"\"\"", "'''", "\"", "'"].into_iter().find_map(|quote| {
        (quoted.len() >= 2 * quote.len() && quoted.starts_with(quote) && quoted.ends_with(quote))
            .then(|| quoted[quote.len()..quoted.len() - quote.len()].to_owned())
    })
}

/// Normalise docstring indentation.
///
/// Tabs expand to 8 spaces, the first line loses its leading whitespace, the
/// common indentation of the remaining lines is removed, and leading and
/// trailing blank lines are dropped.
pub(crate) fn cleandoc(doc: &str) -> String {
    let expanded = doc.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim());
    }
    for line in lines.iter().skip(1) {
        let dedented = line.get(margin..).unwrap_or_else(|| line.trim_start());
        cleaned.push(dedented.trim_end());
    }

    while cleaned.last().is_some_and(|line| line.is_empty()) {
        cleaned.pop();
    }
    let leading = cleaned.iter().take_while(|line| line.is_empty()).count();

    cleaned[leading..].join("\n")
}
