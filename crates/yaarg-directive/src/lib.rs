//! Host glue for yaarg.
//!
//! Turns `::: yaarg <path>[:<symbol>]` directives into rendered Markdown.
//!
//! - [`Invocation`]: parsed target and per-call options
//! - [`ApiReference`]: resolves a generator for the file and renders blocks
//! - [`ApiReference::preprocess`]: expands every directive in a document
//!
//! # Example
//!
//! ```no_run
//! use yaarg_config::{CliSettings, Config};
//! use yaarg_directive::{ApiReference, Invocation};
//!
//! let config = Config::load(None, Some(&CliSettings::default())).unwrap();
//! let mut reference = ApiReference::from_config(&config).unwrap();
//! let invocation = Invocation::parse("pkg/mod.py:add", "depth: 3").unwrap();
//! println!("{}", reference.render_markdown(&invocation).unwrap());
//! ```

mod fence;
mod invocation;
mod preprocess;

use std::path::Path;

use yaarg_config::{Config, PYTHON_GENERATOR};
use yaarg_generator::{GenerateError, GeneratorRegistry, ResolveError, Resolver};

pub use invocation::Invocation;

/// Error raised while handling a directive.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// The option block is not a valid mapping.
    #[error("Invalid directive options: {0}")]
    Options(String),
    /// No generator could be selected or its options are invalid.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The generator failed to read or parse the source.
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// A directive in a document failed.
    #[error("Directive on line {line}: {source}")]
    AtLine {
        /// 1-based line of the directive.
        line: usize,
        /// Underlying failure.
        #[source]
        source: Box<DirectiveError>,
    },
}

/// Registry with the generators shipped with yaarg.
#[must_use]
pub fn builtin_registry() -> GeneratorRegistry {
    GeneratorRegistry::new().with(PYTHON_GENERATOR, yaarg_python::factory)
}

/// Renders API references for directive invocations.
///
/// Owns the resolver and therefore the generator cache; one instance should
/// serve a whole build.
pub struct ApiReference {
    resolver: Resolver,
}

impl ApiReference {
    /// Wrap an existing resolver.
    #[must_use]
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Build from configuration using the built-in generators.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule has an invalid glob or names an unknown generator.
    pub fn from_config(config: &Config) -> Result<Self, DirectiveError> {
        Ok(Self::new(Resolver::from_config(config, builtin_registry())?))
    }

    /// Project root that relative invocation paths are joined onto.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.resolver.base_dir()
    }

    /// Render an invocation into finalized Markdown blocks.
    ///
    /// A symbol that does not exist renders as an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if no generator applies, options are invalid, or the
    /// source cannot be read.
    pub fn render(&mut self, invocation: &Invocation) -> Result<Vec<String>, DirectiveError> {
        let path = self.base_dir().join(&invocation.path);
        let resolved = self.resolver.resolve(
            &path,
            invocation.generator.as_deref(),
            Some(&invocation.options),
        )?;

        let blocks: Vec<String> = resolved
            .generator
            .generate(&path, invocation.symbol.as_deref(), &resolved.options)?
            .collect();

        tracing::debug!(
            path = %path.display(),
            symbol = ?invocation.symbol,
            generator = resolved.generator.name(),
            blocks = blocks.len(),
            "Rendered API reference"
        );

        Ok(blocks)
    }

    /// Render an invocation and join the blocks with blank lines.
    ///
    /// # Errors
    ///
    /// See [`ApiReference::render`].
    pub fn render_markdown(&mut self, invocation: &Invocation) -> Result<String, DirectiveError> {
        Ok(self.render(invocation)?.join("\n\n"))
    }
}
