//! Declaration rendering.
//!
//! [`DocBlocks`] walks the declaration tree lazily in document order. Each
//! node produces its own blocks when reached; its children are then queued
//! with a derived [`RenderContext`].
//!
//! Per kind:
//!
//! - Module: `` `pkg.mod` `` heading, short and long description
//! - Class: `` `Name` `` heading, short and long description
//! - Function: `` `Prefix.name(params)` `` heading, short description,
//!   Arguments, Returns (not for `__init__`) and Details sections

use std::collections::VecDeque;
use std::path::{Component, Path};
use std::rc::Rc;

use yaarg_markdown::{heading, paragraph};

use crate::context::RenderContext;
use crate::docstring::{self, Docstring};
use crate::reconcile::{argument_rows, arguments_table, return_row, returns_table};
use crate::tree::{Class, Declaration, Function, Module};

/// Lazy, finite sequence of Markdown blocks for one declaration subtree.
pub struct DocBlocks {
    pending: VecDeque<String>,
    stack: Vec<(Rc<Declaration>, RenderContext)>,
}

impl DocBlocks {
    /// Blocks for `node` rendered with `context`.
    #[must_use]
    pub fn new(node: Rc<Declaration>, context: RenderContext) -> Self {
        Self {
            pending: VecDeque::new(),
            stack: vec![(node, context)],
        }
    }

    /// An empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pending: VecDeque::new(),
            stack: Vec::new(),
        }
    }

    fn visit(&mut self, node: &Rc<Declaration>, context: &RenderContext) {
        let rendered = match node.as_ref() {
            Declaration::Module(module) => {
                self.pending.extend(module_blocks(module, context));
                true
            }
            Declaration::Class(class) => {
                self.pending.extend(class_blocks(class, context));
                true
            }
            Declaration::Function(function) => match function_blocks(function, context) {
                Some(blocks) => {
                    self.pending.extend(blocks);
                    true
                }
                None => false,
            },
        };

        if rendered && context.deep {
            let child_context = context.child(node);
            for child in node.children().iter().rev() {
                self.stack.push((Rc::clone(child), child_context.clone()));
            }
        }
    }
}

impl Iterator for DocBlocks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(block) = self.pending.pop_front() {
                return Some(block);
            }
            let (node, context) = self.stack.pop()?;
            self.visit(&node, &context);
        }
    }
}

fn push_paragraph(blocks: &mut Vec<String>, text: Option<&str>) {
    if let Some(text) = text.filter(|text| !text.trim().is_empty()) {
        blocks.push(paragraph(text));
    }
}

fn module_blocks(module: &Module, context: &RenderContext) -> Vec<String> {
    let title = module_path(&context.base_dir, &context.file_path);
    let mut blocks = vec![heading(&format!("`{title}`"), context.depth)];

    if let Some(doc) = module.doc.as_deref().map(docstring::parse) {
        push_paragraph(&mut blocks, doc.short_description.as_deref());
        push_paragraph(&mut blocks, doc.long_description.as_deref());
    }
    blocks
}

fn class_blocks(class: &Class, context: &RenderContext) -> Vec<String> {
    let mut blocks = vec![heading(&format!("`{}`", class.name), context.depth)];

    if let Some(doc) = class.doc.as_deref().map(docstring::parse) {
        push_paragraph(&mut blocks, doc.short_description.as_deref());
        push_paragraph(&mut blocks, doc.long_description.as_deref());
    }
    blocks
}

/// Blocks for a function, or `None` when a method filter skips it.
fn function_blocks(function: &Function, context: &RenderContext) -> Option<Vec<String>> {
    let parent_class = context.parent_class();

    let prefix = match parent_class {
        Some(class_name) => {
            if function.doc.is_none() && !context.options.include_undocumented {
                tracing::debug!(method = %function.name, "Skipping undocumented method");
                return None;
            }
            if function.is_private() && !context.options.include_private {
                tracing::debug!(method = %function.name, "Skipping private method");
                return None;
            }
            let separator = if function.is_static() { '.' } else { '#' };
            format!("{class_name}{separator}")
        }
        None => String::new(),
    };

    let doc: Option<Docstring> = function.doc.as_deref().map(docstring::parse);
    let mut blocks = vec![heading(
        &format!("`{prefix}{}({})`", function.name, function.signature()),
        context.depth,
    )];

    if let Some(doc) = &doc {
        push_paragraph(&mut blocks, doc.short_description.as_deref());
    }

    let rows = argument_rows(function, doc.as_ref());
    if !rows.is_empty() {
        blocks.push(heading("Arguments", context.depth + 1));
        blocks.push(arguments_table(&rows));
    }

    if !function.is_constructor() {
        blocks.push(heading("Returns", context.depth + 1));
        blocks.push(returns_table(&return_row(function, doc.as_ref())));
    }

    if let Some(details) = doc.as_ref().and_then(|doc| doc.long_description.as_deref()) {
        blocks.push(heading("Details", context.depth + 1));
        blocks.push(paragraph(details));
    }

    Some(blocks)
}

/// Import-style module path: `pkg/mod.py` is `pkg.mod`, `pkg/__init__.py` is `pkg`.
fn module_path(base_dir: &Path, file_path: &Path) -> String {
    let relative = file_path.strip_prefix(base_dir).unwrap_or(file_path);
    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = parts.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map_or_else(|| last.clone(), |stem| stem.to_string_lossy().into_owned());
        if stem != "__init__" {
            parts.push(stem);
        }
    }

    parts.join(".")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::PythonOptions;
    use crate::syntax::PythonParser;

    fn render_with(source: &str, symbol: Option<&str>, options: PythonOptions) -> Vec<String> {
        let module = Rc::new(
            PythonParser::new()
                .unwrap()
                .parse(source, Path::new("/project/pkg/mod.py"))
                .unwrap(),
        );
        let target = match symbol {
            Some(symbol) => crate::locate::locate(&module, symbol),
            None => Some(module),
        };
        let context = RenderContext::root(
            Path::new("/project"),
            Path::new("/project/pkg/mod.py"),
            symbol,
            options,
        );
        match target {
            Some(node) => DocBlocks::new(node, context).collect(),
            None => DocBlocks::empty().collect(),
        }
    }

    fn render(source: &str, symbol: Option<&str>) -> Vec<String> {
        render_with(source, symbol, PythonOptions::default())
    }

    fn headings(blocks: &[String]) -> Vec<&str> {
        blocks
            .iter()
            .map(String::as_str)
            .filter(|block| block.starts_with('#'))
            .collect()
    }

    const ADD: &str = r#"
def add(a: int, b: int = 1) -> int:
    """Add two numbers.

    Args:
        a: First operand.
    """
    return a + b
"#;

    #[test]
    fn test_add_function() {
        let blocks = render(ADD, Some("add"));
        assert_eq!(
            blocks,
            vec![
                "## `add(a: int, b: int=1)`".to_owned(),
                "Add two numbers.".to_owned(),
                "### Arguments".to_owned(),
                "| Name | Type | Description | Default |\n\
                 | ---- | ---- | ----------- | ------- |\n\
                 | a | int | First operand. | - |\n\
                 | b | int | - | 1 |"
                    .to_owned(),
                "### Returns".to_owned(),
                "| Type | Description |\n| ---- | ----------- |\n| int | - |".to_owned(),
            ]
        );
    }

    #[test]
    fn test_missing_member_renders_nothing() {
        let source = "class Foo:\n    def baz(self):\n        pass\n";
        assert!(render(source, Some("Foo.bar")).is_empty());
        assert!(render(source, Some("Missing")).is_empty());
    }

    #[test]
    fn test_module_heading_depths() {
        let source = r#""""Module summary.

Module details.
"""

class Foo:
    """A foo."""

    def bar(self):
        """Bar it."""

def helper():
    pass
"#;
        let blocks = render(source, None);
        assert_eq!(
            headings(&blocks),
            vec![
                "## `pkg.mod`",
                "### `Foo`",
                "#### `Foo#bar()`",
                "##### Returns",
                "### `helper()`",
                "#### Returns",
            ]
        );
        assert_eq!(blocks[1], "Module summary.");
        assert_eq!(blocks[2], "Module details.");
        assert_eq!(blocks[4], "A foo.");
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render(ADD, None), render(ADD, None));
    }

    #[test]
    fn test_custom_base_depth() {
        let options = PythonOptions {
            depth: 1,
            ..PythonOptions::default()
        };
        let blocks = render_with(ADD, None, options);
        assert_eq!(
            headings(&blocks),
            vec!["# `pkg.mod`", "## `add(a: int, b: int=1)`", "### Arguments", "### Returns"]
        );
    }

    #[test]
    fn test_shallow_render() {
        let options = PythonOptions {
            deep: false,
            ..PythonOptions::default()
        };
        let blocks = render_with("class Foo:\n    def bar(self):\n        pass\n", None, options);
        assert_eq!(blocks, vec!["## `pkg.mod`".to_owned()]);
    }

    #[test]
    fn test_constructor_has_no_returns() {
        let source = r#"
class Point:
    def __init__(self, x: int, y: int = 0):
        """Create a point."""
"#;
        let blocks = render(source, Some("Point"));
        assert_eq!(
            headings(&blocks),
            vec!["## `Point`", "### `Point#__init__(x: int, y: int=0)`", "#### Arguments"]
        );
    }

    #[test]
    fn test_static_and_class_methods() {
        let source = r"
class Factory:
    @staticmethod
    def make(kind):
        pass

    @classmethod
    def default(cls):
        pass

    def build(self):
        pass
";
        let blocks = render(source, Some("Factory"));
        let titles: Vec<&str> = headings(&blocks)
            .into_iter()
            .filter(|heading| heading.starts_with("### `"))
            .collect();
        assert_eq!(
            titles,
            vec![
                "### `Factory.make(kind)`",
                "### `Factory.default()`",
                "### `Factory#build()`",
            ]
        );
    }

    const FILTERED: &str = r#"
class Service:
    def _internal(self):
        pass

    def undocumented(self):
        pass

    def documented(self):
        """Documented."""

    def __repr__(self):
        pass

def _module_helper():
    pass
"#;

    fn method_titles(blocks: &[String]) -> Vec<&str> {
        headings(blocks)
            .into_iter()
            .filter(|heading| heading.contains('('))
            .collect()
    }

    #[test]
    fn test_default_filters() {
        let blocks = render(FILTERED, None);
        assert_eq!(
            method_titles(&blocks),
            vec![
                "#### `Service#undocumented()`",
                "#### `Service#documented()`",
                "#### `Service#__repr__()`",
                "### `_module_helper()`",
            ]
        );
    }

    #[test]
    fn test_private_methods_included_on_request() {
        let options = PythonOptions {
            include_private: true,
            ..PythonOptions::default()
        };
        let blocks = render_with(FILTERED, Some("Service"), options);
        assert!(method_titles(&blocks).contains(&"### `Service#_internal()`"));
    }

    #[test]
    fn test_undocumented_methods_excluded_on_request() {
        let options = PythonOptions {
            include_undocumented: false,
            include_private: false,
            ..PythonOptions::default()
        };
        let blocks = render_with(FILTERED, Some("Service"), options);
        assert_eq!(method_titles(&blocks), vec!["### `Service#documented()`"]);
    }

    #[test]
    fn test_skipped_method_hides_nested_declarations() {
        let options = PythonOptions {
            include_undocumented: false,
            ..PythonOptions::default()
        };
        let source = "class A:\n    def outer(self):\n        def inner():\n            \"\"\"Doc.\"\"\"\n";
        let blocks = render_with(source, Some("A"), options);
        assert_eq!(blocks, vec!["## `A`".to_owned()]);
    }

    #[test]
    fn test_nested_function_is_rendered_after_its_parent() {
        let source = "def outer():\n    def inner(x):\n        pass\n";
        let blocks = render(source, Some("outer"));
        assert_eq!(
            headings(&blocks),
            vec!["## `outer()`", "### Returns", "### `inner(x)`", "#### Arguments", "#### Returns"]
        );
    }

    #[test]
    fn test_details_section() {
        let source = r#"
def f():
    """Summary.

    Longer explanation
    over two lines.
    """
"#;
        let blocks = render(source, Some("f"));
        assert_eq!(
            blocks,
            vec![
                "## `f()`".to_owned(),
                "Summary.".to_owned(),
                "### Returns".to_owned(),
                "| Type | Description |\n| ---- | ----------- |\n| - | - |".to_owned(),
                "### Details".to_owned(),
                "Longer explanation\nover two lines.".to_owned(),
            ]
        );
    }

    #[test]
    fn test_module_path() {
        let base = Path::new("/project");
        assert_eq!(module_path(base, Path::new("/project/pkg/mod.py")), "pkg.mod");
        assert_eq!(module_path(base, Path::new("/project/pkg/__init__.py")), "pkg");
        assert_eq!(module_path(base, Path::new("/project/pkg/sub/stubs.pyi")), "pkg.sub.stubs");
        assert_eq!(module_path(base, Path::new("/elsewhere/mod.py")), "elsewhere.mod");
    }
}
