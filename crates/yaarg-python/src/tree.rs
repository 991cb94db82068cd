//! Owned declaration tree.
//!
//! The syntax tree is converted once into this representation so rendering
//! never touches the parser again. Only declarations are kept; grouping
//! nodes are already flattened away.

use std::rc::Rc;

/// A module, class or function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// The whole source file.
    Module(Module),
    /// A `class` statement.
    Class(Class),
    /// A `def` or `async def` statement.
    Function(Function),
}

/// Module declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    /// Docstring payload after `cleandoc` normalisation.
    pub doc: Option<String>,
    /// Top-level classes and functions in source order.
    pub children: Vec<Rc<Declaration>>,
}

/// Class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    /// Class name.
    pub name: String,
    /// Docstring payload.
    pub doc: Option<String>,
    /// Decorator source text, `@` included.
    pub decorators: Vec<String>,
    /// Methods and nested classes in source order.
    pub children: Vec<Rc<Declaration>>,
}

/// Function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Docstring payload.
    pub doc: Option<String>,
    /// Decorator source text, `@` included.
    pub decorators: Vec<String>,
    /// Parameters as declared, `self`/`cls` included.
    pub params: Vec<Parameter>,
    /// Return annotation source text.
    pub returns: Option<String>,
    /// Nested functions and classes in source order.
    pub children: Vec<Rc<Declaration>>,
}

/// One entry of a parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name without `*`/`**`. `None` for the bare `*` and `/` separators.
    pub name: Option<String>,
    /// Normalised source text, e.g. `b: int=1` or `**kwargs`.
    pub code: String,
    /// Annotation source text.
    pub annotation: Option<String>,
    /// Default expression source text.
    pub default: Option<String>,
}

impl Parameter {
    /// A named parameter; `prefix` is `""`, `"*"` or `"**"`.
    #[must_use]
    pub fn named(
        prefix: &str,
        name: impl Into<String>,
        annotation: Option<String>,
        default: Option<String>,
    ) -> Self {
        let name = name.into();
        let mut code = format!("{prefix}{name}");
        if let Some(annotation) = &annotation {
            code.push_str(": ");
            code.push_str(annotation);
        }
        if let Some(default) = &default {
            code.push('=');
            code.push_str(default);
        }
        Self {
            name: Some(name),
            code,
            annotation,
            default,
        }
    }

    /// A `*` or `/` separator.
    #[must_use]
    pub fn separator(code: &str) -> Self {
        Self {
            name: None,
            code: code.to_owned(),
            annotation: None,
            default: None,
        }
    }
}

impl Declaration {
    /// Declared name. Modules have none.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Module(_) => None,
            Self::Class(class) => Some(&class.name),
            Self::Function(function) => Some(&function.name),
        }
    }

    /// Docstring payload, if the declaration has one.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        match self {
            Self::Module(module) => module.doc.as_deref(),
            Self::Class(class) => class.doc.as_deref(),
            Self::Function(function) => function.doc.as_deref(),
        }
    }

    /// Immediate declaration children in source order.
    #[must_use]
    pub fn children(&self) -> &[Rc<Declaration>] {
        match self {
            Self::Module(module) => &module.children,
            Self::Class(class) => &class.children,
            Self::Function(function) => &function.children,
        }
    }

    /// Whether this is a class.
    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class(_))
    }
}

impl Function {
    /// Parameters shown in signatures: the leading `self`/`cls` is dropped.
    pub fn visible_params(&self) -> &[Parameter] {
        match self.params.first() {
            Some(first) if matches!(first.name.as_deref(), Some("self" | "cls")) => {
                &self.params[1..]
            }
            _ => &self.params,
        }
    }

    /// Parameter list for headings: codes joined with `, `.
    #[must_use]
    pub fn signature(&self) -> String {
        self.visible_params()
            .iter()
            .map(|param| param.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether a decorator mentions `staticmethod` or `classmethod`.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.decorators
            .iter()
            .any(|decorator| decorator.contains("staticmethod") || decorator.contains("classmethod"))
    }

    /// Whether this is a constructor.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == "__init__"
    }

    /// Whether the name follows the private convention: one leading
    /// underscore, no trailing underscore, at least one more character.
    #[must_use]
    pub fn is_private(&self) -> bool {
        let Some(rest) = self.name.strip_prefix('_') else {
            return false;
        };
        !rest.is_empty() && !rest.starts_with('_') && !rest.ends_with('_')
    }
}
