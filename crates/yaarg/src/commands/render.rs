//! `yaarg render` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde_yaml::{Mapping, Value};
use yaarg_config::Options;
use yaarg_directive::Invocation;

use super::load_reference;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// File to document, optionally followed by `:Dotted.symbol`.
    target: String,

    /// Path to configuration file (default: auto-discover yaarg.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root directory (overrides config).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Generator to use instead of the resolver rules.
    #[arg(short, long)]
    generator: Option<String>,

    /// Generator option as KEY=VALUE; VALUE is read as a YAML scalar.
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, option parsing or rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let mut invocation = Invocation::parse(&self.target, "")?;
        invocation.options = parse_option_args(&self.options)?;
        invocation.generator = self.generator;

        let mut reference = load_reference(self.config.as_deref(), self.base_dir)?;
        let markdown = reference.render_markdown(&invocation)?;

        output.markdown(&markdown)?;
        Ok(())
    }
}

/// Parse repeated `KEY=VALUE` arguments into an option map.
fn parse_option_args(args: &[String]) -> Result<Options, CliError> {
    let mut mapping = Mapping::new();

    for arg in args {
        let (key, raw) = arg
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| CliError::Validation(format!("Expected KEY=VALUE, got `{arg}`")))?;

        // Text YAML cannot read (e.g. `[draft`) is taken verbatim.
        let value = serde_yaml::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_owned()));
        if !matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_)) {
            return Err(CliError::Validation(format!(
                "Option `{key}` must be a scalar value, got `{raw}`"
            )));
        }

        mapping.insert(Value::String(key.trim().to_owned()), value);
    }

    serde_yaml::from_value(Value::Mapping(mapping))
        .map_err(|err| CliError::Validation(format!("Invalid options: {err}")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use yaarg_config::OptionValue;

    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|&value| value.to_owned()).collect()
    }

    #[test]
    fn test_scalar_values() {
        let options =
            parse_option_args(&args(&["depth=3", "deep=false", "ratio=0.5", "encoding=latin-1"]))
                .unwrap();

        assert_eq!(options.get("depth"), Some(&OptionValue::Integer(3)));
        assert_eq!(options.get("deep"), Some(&OptionValue::Bool(false)));
        assert_eq!(options.get("ratio"), Some(&OptionValue::Float(0.5)));
        assert_eq!(
            options.get("encoding"),
            Some(&OptionValue::String("latin-1".to_owned()))
        );
    }

    #[test]
    fn test_quoted_string_and_dotted_key() {
        let options = parse_option_args(&args(&["version='3.11'", "methods.private=true"])).unwrap();

        assert_eq!(
            options.get("version"),
            Some(&OptionValue::String("3.11".to_owned()))
        );
        assert_eq!(options.get("methods.private"), Some(&OptionValue::Bool(true)));
    }

    #[test]
    fn test_unparseable_yaml_is_verbatim() {
        let options = parse_option_args(&args(&["note=[draft"])).unwrap();
        assert_eq!(
            options.get("note"),
            Some(&OptionValue::String("[draft".to_owned()))
        );
    }

    #[test]
    fn test_missing_equals() {
        let err = parse_option_args(&args(&["depth"])).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }

    #[test]
    fn test_non_scalar_rejected() {
        let err = parse_option_args(&args(&["depth=[1, 2]"])).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }
}
