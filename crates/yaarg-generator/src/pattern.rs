//! Right-anchored path patterns.
//!
//! A relative pattern matches when its components match the trailing
//! components of the path (`*.py` matches `pkg/mod.py`, `pkg/*.py` matches
//! `src/pkg/mod.py`). An absolute pattern must match the whole absolute path.
//!
//! Matching is per component, so `**` stands for exactly one directory, not
//! any number of them: `src/**/*.py` matches `src/pkg/mod.py` but neither
//! `src/mod.py` nor `src/a/b/mod.py`. Use `*.py` or one rule per depth for
//! recursive layouts.

use std::path::{Component, Path};

use glob::{MatchOptions, Pattern, PatternError};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled glob matched against path components from the right.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    absolute: bool,
    parts: Vec<Pattern>,
}

impl PathPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error for empty patterns or invalid glob syntax.
    pub fn new(raw: &str) -> Result<Self, PatternError> {
        let path = Path::new(raw);
        let parts = path_parts(path)
            .iter()
            .map(|part| Pattern::new(part))
            .collect::<Result<Vec<_>, _>>()?;

        if parts.is_empty() {
            return Err(PatternError {
                pos: 0,
                msg: "empty pattern",
            });
        }

        Ok(Self {
            raw: raw.to_owned(),
            absolute: path.has_root(),
            parts,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `path` matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let parts = path_parts(path);

        if self.absolute {
            if !path.has_root() || parts.len() != self.parts.len() {
                return false;
            }
        } else if parts.len() < self.parts.len() {
            return false;
        }

        let tail = &parts[parts.len() - self.parts.len()..];
        self.parts
            .iter()
            .zip(tail)
            .all(|(pattern, part)| pattern.matches_with(part, MATCH_OPTIONS))
    }
}

fn path_parts(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_owned()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect()
}
