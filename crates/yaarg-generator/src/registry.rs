//! Explicit generator registry.
//!
//! Generators are looked up by a stable string key (`"python"`) in a table
//! filled at setup time, instead of being imported by name at runtime.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::{Generator, LoadError, ResolveError};

/// Builds a generator instance for a project root.
pub type GeneratorFactory = fn(&Path) -> Result<Box<dyn Generator>, LoadError>;

/// Maps generator keys to factories.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use yaarg_generator::{Blocks, GenerateError, Generator, GeneratorRegistry, LoadError, OptionsError};
/// use yaarg_config::Options;
///
/// struct Nothing;
///
/// impl Generator for Nothing {
///     fn name(&self) -> &str { "nothing" }
///     fn validate_options(&self, options: Options) -> Result<Options, OptionsError> { Ok(options) }
///     fn generate(&self, _: &Path, _: Option<&str>, _: &Options) -> Result<Blocks, GenerateError> {
///         Ok(Box::new(std::iter::empty()))
///     }
/// }
///
/// fn load(_base_dir: &Path) -> Result<Box<dyn Generator>, LoadError> {
///     Ok(Box::new(Nothing))
/// }
///
/// let registry = GeneratorRegistry::new().with("nothing", load);
/// assert!(registry.contains("nothing"));
/// ```
#[derive(Default)]
pub struct GeneratorRegistry {
    factories: HashMap<String, GeneratorFactory>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, factory: GeneratorFactory) -> Self {
        self.register(name, factory);
        self
    }

    /// Register a factory under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, factory: GeneratorFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Whether a factory is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a new instance of the generator registered under `name`.
    pub(crate) fn instantiate(
        &self,
        name: &str,
        base_dir: &Path,
    ) -> Result<Box<dyn Generator>, ResolveError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ResolveError::EngineLoad {
                name: name.to_owned(),
                reason: "not registered".to_owned(),
            })?;

        factory(base_dir).map_err(|err| ResolveError::EngineLoad {
            name: name.to_owned(),
            reason: err.0,
        })
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
