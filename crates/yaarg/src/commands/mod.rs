//! CLI command implementations.

pub(crate) mod process;
pub(crate) mod render;

use std::path::{Path, PathBuf};

use yaarg_config::{CliSettings, Config};
use yaarg_directive::ApiReference;

use crate::error::CliError;

pub(crate) use process::ProcessArgs;
pub(crate) use render::RenderArgs;

/// Load configuration and build the renderer shared by all commands.
fn load_reference(
    config_path: Option<&Path>,
    base_dir: Option<PathBuf>,
) -> Result<ApiReference, CliError> {
    let cli_settings = CliSettings { base_dir };
    let config = Config::load(config_path, Some(&cli_settings))?;
    tracing::info!(base_dir = %config.base_dir.display(), "Loaded configuration");
    Ok(ApiReference::from_config(&config)?)
}
