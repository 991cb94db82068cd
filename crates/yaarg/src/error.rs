//! CLI error types.

use yaarg_config::ConfigError;
use yaarg_directive::DirectiveError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Directive(#[from] DirectiveError),

    #[error("{0}")]
    Validation(String),
}
