//! `yaarg process` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use super::load_reference;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the process command.
#[derive(Args)]
pub(crate) struct ProcessArgs {
    /// Markdown document containing `::: yaarg` directives.
    input: PathBuf,

    /// Path to configuration file (default: auto-discover yaarg.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root directory (overrides config).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Write the expanded document here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ProcessArgs {
    /// Execute the process command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or written, or if a
    /// directive fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let markdown = fs::read_to_string(&self.input)?;
        let mut reference = load_reference(self.config.as_deref(), self.base_dir)?;
        let expanded = reference.preprocess(&markdown)?;

        match &self.output {
            Some(path) => {
                fs::write(path, expanded)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.markdown(&expanded)?,
        }
        Ok(())
    }
}
