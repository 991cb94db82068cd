//! Directive invocation parsing.
//!
//! An invocation is a target `<path>[:<symbol>]` plus an optional YAML option
//! block:
//!
//! ```text
//! ::: yaarg pkg/mod.py:Client.connect
//!     generator: python
//!     depth: 3
//!     methods:
//!       private: true
//! ```

use std::path::PathBuf;

use yaarg_config::{OptionValue, Options};

use crate::DirectiveError;

/// Option key selecting a generator explicitly.
const GENERATOR_KEY: &str = "generator";
/// Option key reserved for resolver-level overrides.
const RESOLVER_KEY: &str = "resolver";

/// A parsed request to render one API reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Source file, relative to the project root unless absolute.
    pub path: PathBuf,
    /// Dotted symbol path inside the file.
    pub symbol: Option<String>,
    /// Explicit generator key, bypassing resolver rules.
    pub generator: Option<String>,
    /// Per-call options.
    pub options: Options,
}

impl Invocation {
    /// Invocation for a whole file with no options.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            symbol: None,
            generator: None,
            options: Options::new(),
        }
    }

    /// Narrow the invocation to a dotted symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Parse a target and its option block.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::Options`] if the option text is not a YAML
    /// mapping of scalars, or if `generator` is not a string.
    pub fn parse(target: &str, option_text: &str) -> Result<Self, DirectiveError> {
        let (path, symbol) = split_target(target.trim());
        let mut options = parse_options(option_text)?;

        let generator = match options.remove(GENERATOR_KEY) {
            Some(OptionValue::String(name)) => Some(name),
            Some(other) => {
                return Err(DirectiveError::Options(format!(
                    "`{GENERATOR_KEY}` must be a string, got {} {other}",
                    other.type_name()
                )));
            }
            None => None,
        };

        let reserved_prefix = format!("{RESOLVER_KEY}.");
        options.retain(|key, _| {
            let reserved = key == RESOLVER_KEY || key.starts_with(&reserved_prefix);
            if reserved {
                tracing::debug!(key, "Ignoring reserved resolver option");
            }
            !reserved
        });

        Ok(Self {
            path: PathBuf::from(path),
            symbol: symbol.map(str::to_owned),
            generator,
            options,
        })
    }
}

/// Split `path:symbol` at the last colon when the suffix is a dotted
/// identifier path. Anything else is taken as a plain path.
fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.rsplit_once(':') {
        Some((path, symbol)) if !path.is_empty() && is_symbol_path(symbol) => (path, Some(symbol)),
        _ => (target, None),
    }
}

fn is_symbol_path(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|first| first == '_' || first.is_alphabetic())
                && chars.all(|c| c == '_' || c.is_alphanumeric())
        })
}

fn parse_options(text: &str) -> Result<Options, DirectiveError> {
    if text.trim().is_empty() {
        return Ok(Options::new());
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|err| DirectiveError::Options(err.to_string()))?;

    match value {
        serde_yaml::Value::Null => Ok(Options::new()),
        serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)
            .map_err(|err| DirectiveError::Options(err.to_string())),
        _ => Err(DirectiveError::Options(
            "expected a mapping of option keys to values".to_owned(),
        )),
    }
}
