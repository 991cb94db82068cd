//! Per-level render context.

use std::path::Path;
use std::rc::Rc;

use crate::options::PythonOptions;
use crate::tree::Declaration;

/// Immutable state for rendering one declaration.
///
/// Descending into a child goes through [`RenderContext::child`], which sets
/// the parent and increments the depth; siblings share nothing mutable.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Project root, used for the module title.
    pub base_dir: Rc<Path>,
    /// Source file being documented.
    pub file_path: Rc<Path>,
    /// Requested dotted symbol.
    pub symbol: Option<Rc<str>>,
    /// Enclosing declaration.
    pub parent: Option<Rc<Declaration>>,
    /// Heading level for this declaration.
    pub depth: usize,
    /// Whether to render nested declarations.
    pub deep: bool,
    /// Validated options.
    pub options: Rc<PythonOptions>,
}

impl RenderContext {
    /// Context for the top-most rendered declaration.
    #[must_use]
    pub fn root(
        base_dir: &Path,
        file_path: &Path,
        symbol: Option<&str>,
        options: PythonOptions,
    ) -> Self {
        Self {
            base_dir: Rc::from(base_dir),
            file_path: Rc::from(file_path),
            symbol: symbol.map(Rc::from),
            parent: None,
            depth: options.depth,
            deep: options.deep,
            options: Rc::new(options),
        }
    }

    /// Context for a child of `parent`, one heading level deeper.
    #[must_use]
    pub fn child(&self, parent: &Rc<Declaration>) -> Self {
        Self {
            parent: Some(Rc::clone(parent)),
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    /// Name of the enclosing class, if the parent is a class.
    #[must_use]
    pub fn parent_class(&self) -> Option<&str> {
        self.parent
            .as_deref()
            .filter(|parent| parent.is_class())
            .and_then(Declaration::name)
    }
}
