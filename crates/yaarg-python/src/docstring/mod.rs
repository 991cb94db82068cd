//! Docstring parsing.
//!
//! Splits a cleaned docstring into a short description, a long description,
//! parameter entries and a return entry. Three styles are recognized:
//!
//! - reStructuredText field lists (`:param x:`, `:type x:`, `:returns:`, `:rtype:`)
//! - NumPy sections (a title underlined with dashes)
//! - Google sections (`Args:`, `Returns:`); also the fallback for plain prose

mod google;
mod numpy;
mod rest;

use std::sync::LazyLock;

use regex::Regex;

/// Parsed docstring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Docstring {
    /// First line of the description.
    pub short_description: Option<String>,
    /// Remaining description prose before the first section.
    pub long_description: Option<String>,
    /// Parameter entries in documented order.
    pub params: Vec<DocParam>,
    /// Return entry.
    pub returns: Option<DocReturns>,
}

/// Documented parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocParam {
    /// Parameter name without `*`/`**`.
    pub name: String,
    /// Declared type, `optional` marker removed.
    pub type_name: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// Default value mentioned in the type or description.
    pub default: Option<String>,
}

/// Documented return value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocReturns {
    /// Declared return type.
    pub type_name: Option<String>,
    /// Description text.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Google,
    Numpy,
    Rest,
}

/// Parse a docstring, auto-detecting its style.
#[must_use]
pub fn parse(text: &str) -> Docstring {
    let text = text.trim();
    if text.is_empty() {
        return Docstring::default();
    }

    match detect(text) {
        Style::Rest => rest::parse(text),
        Style::Numpy => numpy::parse(text),
        Style::Google => google::parse(text),
    }
}

fn detect(text: &str) -> Style {
    let lines: Vec<&str> = text.lines().collect();
    if lines.iter().any(|line| rest::is_field(line)) {
        Style::Rest
    } else if (0..lines.len()).any(|i| numpy::is_section_header(&lines, i)) {
        Style::Numpy
    } else {
        Style::Google
    }
}

impl DocParam {
    fn new(name: &str) -> Self {
        Self {
            name: name.trim().trim_start_matches('*').to_owned(),
            ..Self::default()
        }
    }
}

/// Split description prose into short (first line) and long (rest).
fn split_description(text: &str) -> (Option<String>, Option<String>) {
    let text = text.trim();
    match text.split_once('\n') {
        Some((short, long)) => (non_empty(short), non_empty(long)),
        None => (non_empty(text), None),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

/// Remove a trailing `optional` marker from a type.
fn strip_optional(type_name: &str) -> Option<String> {
    let trimmed = type_name.trim();
    let stripped = trimmed
        .strip_suffix("optional")
        .map_or(trimmed, |rest| rest.trim_end().trim_end_matches(',').trim_end());
    non_empty(stripped)
}

static DEFAULT_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdefault(?:s\s+to|\s+is|\s*[:=])\s*(\S.*?)\.?\s*$")
        .expect("default phrase regex is valid")
});

/// Default value named by a `Defaults to X.` phrase at the end of a description.
fn find_default(description: &str) -> Option<String> {
    let text = description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    DEFAULT_PHRASE
        .captures(&text)
        .and_then(|captures| captures.get(1))
        .and_then(|value| non_empty(value.as_str()))
}

/// Byte offset of the first `needle` outside brackets and quotes.
fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (index, c) in text.char_indices() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth = depth.saturating_sub(1),
            (None, c) if c == needle && depth == 0 => return Some(index),
            _ => {}
        }
    }
    None
}

/// Split `type: description` when the part before the colon reads as a type.
fn split_typed(text: &str) -> DocReturns {
    let text = text.trim();
    if let Some(colon) = find_top_level(text, ':') {
        let (head, rest) = text.split_at(colon);
        let head = head.trim();
        if !head.is_empty() && find_top_level(head, ' ').is_none() {
            return DocReturns {
                type_name: Some(head.to_owned()),
                description: non_empty(&rest[1..]),
            };
        }
    }
    DocReturns {
        type_name: None,
        description: non_empty(text),
    }
}

/// Remove the common indentation of non-blank lines.
fn dedent<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let margin = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| line.get(margin..).unwrap_or_else(|| line.trim_start()))
        .collect()
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Group dedented lines into items: an unindented line starts an item,
/// indented lines continue it.
fn items<'a>(lines: &[&'a str]) -> Vec<(&'a str, Vec<&'a str>)> {
    let mut items: Vec<(&'a str, Vec<&'a str>)> = Vec::new();
    for line in dedent(lines) {
        if line.trim().is_empty() {
            if let Some((_, body)) = items.last_mut() {
                body.push("");
            }
        } else if indent_of(line) == 0 {
            items.push((line, Vec::new()));
        } else if let Some((_, body)) = items.last_mut() {
            body.push(line.trim());
        }
    }
    items
}

/// Join continuation lines into one description.
fn join_lines(first: &str, rest: &[&str]) -> Option<String> {
    let mut text = first.trim().to_owned();
    for line in rest {
        text.push('\n');
        text.push_str(line);
    }
    non_empty(&text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_prose() {
        let doc = parse("Add numbers.\n\nWorks with ints.\nAnd floats.");
        assert_eq!(doc.short_description.as_deref(), Some("Add numbers."));
        assert_eq!(
            doc.long_description.as_deref(),
            Some("Works with ints.\nAnd floats.")
        );
        assert!(doc.params.is_empty());
        assert_eq!(doc.returns, None);
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse("   \n  "), Docstring::default());
    }

    #[test]
    fn test_detect() {
        assert_eq!(detect("Sum.\n\n:param a: first"), Style::Rest);
        assert_eq!(detect("Sum.\n\nParameters\n----------\na : int"), Style::Numpy);
        assert_eq!(detect("Sum.\n\nArgs:\n    a: first"), Style::Google);
        assert_eq!(detect("Just prose."), Style::Google);
    }

    #[test]
    fn test_strip_optional() {
        assert_eq!(strip_optional("int, optional").as_deref(), Some("int"));
        assert_eq!(strip_optional("int optional").as_deref(), Some("int"));
        assert_eq!(strip_optional("int").as_deref(), Some("int"));
        assert_eq!(strip_optional("optional"), None);
    }

    #[test]
    fn test_find_default() {
        assert_eq!(find_default("The value. Defaults to 1.").as_deref(), Some("1"));
        assert_eq!(
            find_default("Mode.\nDefaults to \"fast\".").as_deref(),
            Some("\"fast\"")
        );
        assert_eq!(find_default("default: None").as_deref(), Some("None"));
        assert_eq!(find_default("The value."), None);
        assert_eq!(find_default("Falls back to system defaults when unset."), None);
    }

    #[test]
    fn test_split_typed() {
        assert_eq!(
            split_typed("int: The sum."),
            DocReturns {
                type_name: Some("int".to_owned()),
                description: Some("The sum.".to_owned()),
            }
        );
        assert_eq!(
            split_typed("Dict[str, int]: Mapping."),
            DocReturns {
                type_name: Some("Dict[str, int]".to_owned()),
                description: Some("Mapping.".to_owned()),
            }
        );
        assert_eq!(
            split_typed("The sum of a: and b."),
            DocReturns {
                type_name: None,
                description: Some("The sum of a: and b.".to_owned()),
            }
        );
    }

    #[test]
    fn test_items() {
        let lines = ["    a: first", "        continued", "", "    b: second"];
        let items = items(&lines);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, "a: first");
        assert_eq!(items[0].1, vec!["continued", ""]);
        assert_eq!(items[1].0, "b: second");
    }
}
