//! Configuration management for yaarg.
//!
//! Parses `yaarg.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The file declares the project root and an ordered list of resolver rules:
//!
//! ```toml
//! [project]
//! base_dir = "."
//!
//! [[resolver]]
//! glob = "scripts/*.py"
//! generator = "python"
//! options = { depth = 3, methods = { private = true } }
//! ```
//!
//! Built-in fallback rules are appended after the declared ones by
//! [`Config::rules`], so every Python file has at least one matching rule.
//!
//! CLI settings can be applied during load via [`CliSettings`].

mod options;

pub use options::{OptionValue, Options};

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "yaarg.toml";

/// Registry key of the built-in Python generator.
pub const PYTHON_GENERATOR: &str = "python";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override project root directory.
    pub base_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project configuration (paths are relative strings from TOML).
    project: ProjectConfigRaw,
    /// Resolver rules in declaration order.
    resolver: Vec<RuleConfig>,

    /// Resolved project root (set after loading).
    #[serde(skip)]
    pub base_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw project configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ProjectConfigRaw {
    base_dir: Option<String>,
}

/// A resolver rule: files matching `glob` are documented by `generator`
/// with `options` as rule-level defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleConfig {
    /// Glob pattern matched against the file path, from the right.
    pub glob: String,
    /// Registry key of the generator.
    pub generator: String,
    /// Rule-level default options.
    #[serde(default)]
    pub options: Options,
}

impl RuleConfig {
    /// Create a rule without default options.
    #[must_use]
    pub fn new(glob: impl Into<String>, generator: impl Into<String>) -> Self {
        Self {
            glob: glob.into(),
            generator: generator.into(),
            options: Options::new(),
        }
    }

    /// Set the rule-level default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

/// Rules appended after the user-declared ones.
#[must_use]
pub fn builtin_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new("*.py", PYTHON_GENERATOR),
        RuleConfig::new("*.pyi", PYTHON_GENERATOR),
    ]
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `yaarg.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Rules in resolution order: declared rules first, then [`builtin_rules`].
    #[must_use]
    pub fn rules(&self) -> Vec<RuleConfig> {
        self.resolver.iter().cloned().chain(builtin_rules()).collect()
    }

    /// Rules declared in the config file only.
    #[must_use]
    pub fn declared_rules(&self) -> &[RuleConfig] {
        &self.resolver
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a rule has an empty glob or generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, rule) in self.resolver.iter().enumerate() {
            require_non_empty(&rule.glob, &format!("resolver[{index}].glob"))?;
            require_non_empty(&rule.generator, &format!("resolver[{index}].generator"))?;
        }
        Ok(())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_dir) = &settings.base_dir {
            self.base_dir.clone_from(base_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config rooted at the current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config rooted at the given directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            project: ProjectConfigRaw::default(),
            resolver: Vec::new(),
            base_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Resolve the project root relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.base_dir = match self.project.base_dir.as_deref() {
            Some(base_dir) => config_dir.join(base_dir),
            None => config_dir.to_path_buf(),
        };
    }
}
