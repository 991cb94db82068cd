//! NumPy style: section titles underlined with dashes.

use super::{
    DocParam, DocReturns, Docstring, find_default, find_top_level, items, join_lines, non_empty,
    split_description, strip_optional,
};

const PARAM_SECTIONS: &[&str] = &[
    "parameters",
    "params",
    "arguments",
    "args",
    "other parameters",
    "keyword arguments",
    "receives",
];

const RETURN_SECTIONS: &[&str] = &["returns", "yields"];

/// Whether `lines[index]` is a title followed by a dashed underline.
pub(super) fn is_section_header(lines: &[&str], index: usize) -> bool {
    let Some(title) = lines.get(index) else {
        return false;
    };
    let Some(underline) = lines.get(index + 1) else {
        return false;
    };
    let underline = underline.trim();
    let title = title.trim_end();
    !title.is_empty()
        && !title.starts_with(char::is_whitespace)
        && !is_rule(title)
        && underline.len() >= 3
        && is_rule(underline)
}

fn is_rule(line: &str) -> bool {
    line.chars().all(|c| c == '-')
}

pub(super) fn parse(text: &str) -> Docstring {
    let lines: Vec<&str> = text.lines().collect();
    let headers: Vec<usize> = (0..lines.len())
        .filter(|&index| is_section_header(&lines, index))
        .collect();

    let description_end = headers.first().copied().unwrap_or(lines.len());
    let (short_description, long_description) =
        split_description(&lines[..description_end].join("\n"));

    let mut doc = Docstring {
        short_description,
        long_description,
        ..Docstring::default()
    };

    for (position, &start) in headers.iter().enumerate() {
        let end = headers.get(position + 1).copied().unwrap_or(lines.len());
        // Stray rules under a section carry no content.
        let body: Vec<&str> = lines
            .get(start + 2..end)
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|line| line.trim().is_empty() || !is_rule(line.trim()))
            .collect();
        let title = lines[start].trim().to_ascii_lowercase();

        if PARAM_SECTIONS.contains(&title.as_str()) {
            for (head, rest) in items(&body) {
                doc.params.extend(params(head, &rest));
            }
        } else if RETURN_SECTIONS.contains(&title.as_str()) && doc.returns.is_none() {
            doc.returns = items(&body)
                .first()
                .map(|(head, rest)| returns(head, rest));
        }
    }

    doc
}

/// `name : type` or `a, b : type`; each name becomes an entry.
fn params(head: &str, rest: &[&str]) -> Vec<DocParam> {
    let (names, type_part) = match find_top_level(head, ':') {
        Some(colon) => (&head[..colon], Some(&head[colon + 1..])),
        None => (head, None),
    };
    let (type_name, type_default) = type_part.map_or((None, None), split_type);
    let description = join_lines("", rest);
    let default = type_default.or_else(|| description.as_deref().and_then(find_default));

    names
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| DocParam {
            type_name: type_name.clone(),
            description: description.clone(),
            default: default.clone(),
            ..DocParam::new(name)
        })
        .collect()
}

/// Split `int, default 1` / `int, optional` into type and default.
fn split_type(type_part: &str) -> (Option<String>, Option<String>) {
    let lowered = type_part.to_ascii_lowercase();
    match lowered.find("default") {
        Some(position) => {
            let default = type_part[position + "default".len()..]
                .trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '=');
            let type_name = type_part[..position].trim_end().trim_end_matches(',');
            (strip_optional(type_name), non_empty(default))
        }
        None => (strip_optional(type_part), None),
    }
}

/// `type` or `name : type`, description on the indented lines.
fn returns(head: &str, rest: &[&str]) -> DocReturns {
    let type_name = match find_top_level(head, ':') {
        Some(colon) => non_empty(&head[colon + 1..]),
        None => non_empty(head),
    };
    DocReturns {
        type_name,
        description: join_lines("", rest),
    }
}
