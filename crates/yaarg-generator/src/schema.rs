//! Declarative option schemas.
//!
//! Each generator describes the options it understands with an
//! [`OptionSchema`]. Validation rejects unknown keys and type mismatches and
//! fills in defaults for keys that were not given.

use std::fmt;

use yaarg_config::{OptionValue, Options};

use crate::OptionsError;

/// Value type accepted for an option key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `true` / `false`.
    Bool,
    /// Whole number.
    Integer,
    /// Text.
    String,
}

impl OptionKind {
    /// Whether a value has this type. No coercion is performed.
    #[must_use]
    pub fn accepts(self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (Self::Bool, OptionValue::Bool(_))
                | (Self::Integer, OptionValue::Integer(_))
                | (Self::String, OptionValue::String(_))
        )
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("a boolean"),
            Self::Integer => f.write_str("an integer"),
            Self::String => f.write_str("a string"),
        }
    }
}

#[derive(Debug, Clone)]
struct OptionEntry {
    key: String,
    kind: OptionKind,
    default: Option<OptionValue>,
}

/// Set of recognized option keys with their types and defaults.
///
/// # Example
///
/// ```
/// use yaarg_config::{OptionValue, Options};
/// use yaarg_generator::{OptionKind, OptionSchema};
///
/// let schema = OptionSchema::new()
///     .optional("version", OptionKind::String)
///     .with_default("depth", OptionKind::Integer, 2);
///
/// let validated = schema.validate(Options::new()).unwrap();
/// assert_eq!(validated.get("depth"), Some(&OptionValue::Integer(2)));
/// assert!(!validated.contains_key("version"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionSchema {
    entries: Vec<OptionEntry>,
}

impl OptionSchema {
    /// Create an empty schema that accepts no keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a key without a default. It stays absent unless given.
    #[must_use]
    pub fn optional(mut self, key: impl Into<String>, kind: OptionKind) -> Self {
        self.entries.push(OptionEntry {
            key: key.into(),
            kind,
            default: None,
        });
        self
    }

    /// Declare a key filled with `default` when not given.
    #[must_use]
    pub fn with_default(
        mut self,
        key: impl Into<String>,
        kind: OptionKind,
        default: impl Into<OptionValue>,
    ) -> Self {
        let default = default.into();
        debug_assert!(kind.accepts(&default), "default does not match kind");
        self.entries.push(OptionEntry {
            key: key.into(),
            kind,
            default: Some(default),
        });
        self
    }

    /// Declared keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// Type-check `options` and fill in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::UnknownKey`] for undeclared keys and
    /// [`OptionsError::WrongType`] for type mismatches. Keys are checked in
    /// sorted order, so the reported error is deterministic.
    pub fn validate(&self, options: Options) -> Result<Options, OptionsError> {
        for (key, value) in &options {
            let entry = self
                .entries
                .iter()
                .find(|entry| entry.key == *key)
                .ok_or_else(|| OptionsError::UnknownKey(key.clone()))?;

            if !entry.kind.accepts(value) {
                return Err(OptionsError::WrongType {
                    key: key.clone(),
                    expected: entry.kind,
                    value: value.clone(),
                });
            }
        }

        let mut validated = options;
        for entry in &self.entries {
            if let Some(default) = &entry.default
                && !validated.contains_key(&entry.key)
            {
                validated.insert(entry.key.clone(), default.clone());
            }
        }

        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema() -> OptionSchema {
        OptionSchema::new()
            .optional("version", OptionKind::String)
            .with_default("encoding", OptionKind::String, "utf-8")
            .with_default("depth", OptionKind::Integer, 2)
            .with_default("methods.private", OptionKind::Bool, false)
    }

    #[test]
    fn test_fills_defaults() {
        let validated = schema().validate(Options::new()).unwrap();

        assert_eq!(validated.len(), 3);
        assert_eq!(validated.get("encoding"), Some(&OptionValue::from("utf-8")));
        assert_eq!(validated.get("depth"), Some(&OptionValue::Integer(2)));
        assert_eq!(
            validated.get("methods.private"),
            Some(&OptionValue::Bool(false))
        );
    }

    #[test]
    fn test_given_values_win_over_defaults() {
        let options: Options = [("depth", 4)].into_iter().collect();
        let validated = schema().validate(options).unwrap();
        assert_eq!(validated.get("depth"), Some(&OptionValue::Integer(4)));
    }

    #[test]
    fn test_optional_key_without_default_stays_absent() {
        let validated = schema().validate(Options::new()).unwrap();
        assert!(!validated.contains_key("version"));
    }

    #[test]
    fn test_unknown_key() {
        let options: Options = [("colour", "red")].into_iter().collect();
        let err = schema().validate(options).unwrap_err();

        assert!(matches!(&err, OptionsError::UnknownKey(key) if key == "colour"));
        assert_eq!(err.to_string(), "unknown option `colour`");
    }

    #[test]
    fn test_wrong_type() {
        let options: Options = [("depth", "3")].into_iter().collect();
        let err = schema().validate(options).unwrap_err();

        assert!(matches!(&err, OptionsError::WrongType { key, .. } if key == "depth"));
        assert_eq!(
            err.to_string(),
            "option `depth` must be an integer, got string \"3\""
        );
    }

    #[test]
    fn test_no_bool_int_coercion() {
        let options: Options = [("methods.private", 1)].into_iter().collect();
        assert!(schema().validate(options).is_err());
    }

    #[test]
    fn test_keys() {
        let schema = schema();
        let keys: Vec<&str> = schema.keys().collect();
        assert_eq!(keys, vec!["version", "encoding", "depth", "methods.private"]);
    }
}
