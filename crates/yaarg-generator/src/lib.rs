//! Generator abstraction for yaarg.
//!
//! A [`Generator`] turns one source file (optionally narrowed to a dotted
//! symbol) into a lazy sequence of Markdown blocks. Generators are created
//! through a [`GeneratorRegistry`] and selected per file by a [`Resolver`],
//! which also merges and validates options.
//!
//! # Example
//!
//! ```ignore
//! use yaarg_generator::{GeneratorRegistry, Resolver};
//!
//! let registry = GeneratorRegistry::new().with("python", yaarg_python::factory);
//! let mut resolver = Resolver::from_config(&config, registry)?;
//! let resolved = resolver.resolve(Path::new("pkg/mod.py"), None, None)?;
//! for block in resolved.generator.generate(path, Some("add"), &resolved.options)? {
//!     println!("{block}");
//! }
//! ```

mod error;
mod pattern;
mod registry;
mod resolver;
mod schema;

use std::path::Path;

use yaarg_config::Options;

pub use error::{GenerateError, LoadError, OptionsError, ResolveError};
pub use pattern::PathPattern;
pub use registry::{GeneratorFactory, GeneratorRegistry};
pub use resolver::{Resolved, Resolver, ResolverRule};
pub use schema::{OptionKind, OptionSchema};

/// Lazy sequence of rendered Markdown blocks.
pub type Blocks = Box<dyn Iterator<Item = String>>;

/// Language-specific documentation generator.
pub trait Generator {
    /// Human-readable generator name.
    fn name(&self) -> &str;

    /// Check option keys and types and fill defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys, wrong types or invalid values.
    fn validate_options(&self, options: Options) -> Result<Options, OptionsError>;

    /// Render blocks for `file_path`, optionally narrowed to a dotted `symbol`.
    ///
    /// A symbol that does not resolve yields an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    fn generate(
        &self,
        file_path: &Path,
        symbol: Option<&str>,
        options: &Options,
    ) -> Result<Blocks, GenerateError>;
}
