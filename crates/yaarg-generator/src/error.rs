//! Error types for option validation, generator resolution and generation.

use std::io;
use std::path::PathBuf;

use yaarg_config::OptionValue;

use crate::schema::OptionKind;

/// Option validation error.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Key not declared by the generator's schema.
    #[error("unknown option `{0}`")]
    UnknownKey(String),
    /// Value has the wrong type for the key.
    #[error("option `{key}` must be {expected}, got {} {value}", .value.type_name())]
    WrongType {
        /// Dotted option key.
        key: String,
        /// Type declared by the schema.
        expected: OptionKind,
        /// Offending value.
        value: OptionValue,
    },
    /// Value has the right type but is out of range or unsupported.
    #[error("invalid value for option `{key}`: {message}")]
    InvalidValue {
        /// Dotted option key.
        key: String,
        /// What is wrong with the value.
        message: String,
    },
}

/// Error returned by a generator factory when it cannot build an instance.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct LoadError(pub String);

/// Generator resolution error.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No rule matched the file and no generator was requested explicitly.
    #[error("No generator matches {}", .0.display())]
    NoMatchingEngine(PathBuf),
    /// The generator reference cannot be turned into an instance.
    #[error("Cannot load generator `{name}`: {reason}")]
    EngineLoad {
        /// Registry key that was requested.
        name: String,
        /// Why loading failed.
        reason: String,
    },
    /// A rule glob is not a valid pattern.
    #[error("Invalid glob pattern `{pattern}`: {source}")]
    InvalidGlob {
        /// The pattern as written.
        pattern: String,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },
    /// The merged options failed schema validation.
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
}

/// Error raised while generating blocks for a file.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The source file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Source file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The source file is not valid text in the configured encoding.
    #[error("{} is not valid {encoding} text", .path.display())]
    Decode {
        /// Source file path.
        path: PathBuf,
        /// Configured encoding name.
        encoding: String,
    },
    /// The source could not be parsed at all.
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse {
        /// Source file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// Options handed to `generate` do not satisfy the generator's schema.
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
}
