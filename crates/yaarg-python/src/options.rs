//! Python generator options.

use yaarg_config::Options;
use yaarg_generator::{OptionKind, OptionSchema, OptionsError};

use crate::source::Encoding;

const VERSION: &str = "version";
const ENCODING: &str = "encoding";
const DEPTH: &str = "depth";
const DEEP: &str = "deep";
const METHODS_UNDOCUMENTED: &str = "methods.undocumented";
const METHODS_PRIVATE: &str = "methods.private";

/// Option schema of the Python generator.
pub(crate) fn schema() -> OptionSchema {
    OptionSchema::new()
        .optional(VERSION, OptionKind::String)
        .with_default(ENCODING, OptionKind::String, "utf-8")
        .with_default(DEPTH, OptionKind::Integer, 2)
        .with_default(DEEP, OptionKind::Bool, true)
        .with_default(METHODS_UNDOCUMENTED, OptionKind::Bool, true)
        .with_default(METHODS_PRIVATE, OptionKind::Bool, false)
}

/// Validated, typed Python generator options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonOptions {
    /// Target grammar version (`3` or `3.N`); `None` means auto-detect.
    pub version: Option<String>,
    /// Source file encoding.
    pub encoding: Encoding,
    /// Heading level of the top-most rendered declaration.
    pub depth: usize,
    /// Whether to render nested declarations.
    pub deep: bool,
    /// Whether methods without a docstring are rendered.
    pub include_undocumented: bool,
    /// Whether `_private` methods are rendered.
    pub include_private: bool,
}

impl Default for PythonOptions {
    fn default() -> Self {
        Self {
            version: None,
            encoding: Encoding::Utf8,
            depth: 2,
            deep: true,
            include_undocumented: true,
            include_private: false,
        }
    }
}

impl PythonOptions {
    /// Validate a raw option map and convert it.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys, wrong types, an unsupported
    /// encoding, a depth below 1 or a version other than `3`/`3.N`.
    pub fn from_options(options: &Options) -> Result<Self, OptionsError> {
        let validated = schema().validate(options.clone())?;
        let defaults = Self::default();

        let version = validated
            .get(VERSION)
            .and_then(|value| value.as_str())
            .map(parse_version)
            .transpose()?;

        let encoding = match validated.get(ENCODING).and_then(|value| value.as_str()) {
            Some(label) => Encoding::from_label(label).ok_or_else(|| OptionsError::InvalidValue {
                key: ENCODING.to_owned(),
                message: format!("unsupported encoding `{label}`"),
            })?,
            None => defaults.encoding,
        };

        let depth = match validated.get(DEPTH).and_then(|value| value.as_integer()) {
            Some(depth) => usize::try_from(depth)
                .ok()
                .filter(|&depth| depth >= 1)
                .ok_or_else(|| OptionsError::InvalidValue {
                    key: DEPTH.to_owned(),
                    message: format!("heading level must be at least 1, got {depth}"),
                })?,
            None => defaults.depth,
        };

        let flag = |key: &str, default: bool| {
            validated
                .get(key)
                .and_then(|value| value.as_bool())
                .unwrap_or(default)
        };

        Ok(Self {
            version,
            encoding,
            depth,
            deep: flag(DEEP, defaults.deep),
            include_undocumented: flag(METHODS_UNDOCUMENTED, defaults.include_undocumented),
            include_private: flag(METHODS_PRIVATE, defaults.include_private),
        })
    }
}

fn parse_version(version: &str) -> Result<String, OptionsError> {
    let valid = match version.split_once('.') {
        Some((major, minor)) => {
            major == "3" && !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit())
        }
        None => version == "3",
    };

    if valid {
        Ok(version.to_owned())
    } else {
        Err(OptionsError::InvalidValue {
            key: VERSION.to_owned(),
            message: format!("unsupported Python version `{version}`, expected `3` or `3.N`"),
        })
    }
}
