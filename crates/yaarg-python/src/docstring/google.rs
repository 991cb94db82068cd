//! Google style: `Args:` / `Returns:` sections with indented items.

use super::{
    DocParam, DocReturns, Docstring, find_default, find_top_level, items, join_lines,
    split_description, split_typed, strip_optional,
};

const PARAM_SECTIONS: &[&str] = &[
    "args",
    "arguments",
    "parameters",
    "params",
    "keyword args",
    "keyword arguments",
    "other parameters",
];

const RETURN_SECTIONS: &[&str] = &["returns", "return", "yields", "yield"];

const OTHER_SECTIONS: &[&str] = &[
    "raises",
    "exceptions",
    "except",
    "attributes",
    "example",
    "examples",
    "note",
    "notes",
    "warning",
    "warnings",
    "see also",
    "todo",
];

enum Section {
    Params,
    Returns,
    Other,
}

fn section(line: &str) -> Option<Section> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let title = line.trim_end().strip_suffix(':')?.to_ascii_lowercase();
    let title = title.as_str();
    if PARAM_SECTIONS.contains(&title) {
        Some(Section::Params)
    } else if RETURN_SECTIONS.contains(&title) {
        Some(Section::Returns)
    } else if OTHER_SECTIONS.contains(&title) {
        Some(Section::Other)
    } else {
        None
    }
}

pub(super) fn parse(text: &str) -> Docstring {
    let lines: Vec<&str> = text.lines().collect();
    let headers: Vec<(usize, Section)> = lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| section(line).map(|kind| (index, kind)))
        .collect();

    let description_end = headers.first().map_or(lines.len(), |(index, _)| *index);
    let (short_description, long_description) =
        split_description(&lines[..description_end].join("\n"));

    let mut doc = Docstring {
        short_description,
        long_description,
        ..Docstring::default()
    };

    for (position, (start, kind)) in headers.iter().enumerate() {
        let end = headers
            .get(position + 1)
            .map_or(lines.len(), |(index, _)| *index);
        let body = &lines[start + 1..end];

        match kind {
            Section::Params => doc
                .params
                .extend(items(body).into_iter().map(|(head, rest)| param(head, &rest))),
            Section::Returns => {
                if doc.returns.is_none() {
                    doc.returns = returns(body);
                }
            }
            Section::Other => {}
        }
    }

    doc
}

/// `name (type): description` or `name: description`.
fn param(head: &str, rest: &[&str]) -> DocParam {
    let (signature, first_line) = match find_top_level(head, ':') {
        Some(colon) => (&head[..colon], &head[colon + 1..]),
        None => (head, ""),
    };

    let (name, type_name) = match signature.split_once('(') {
        Some((name, type_part)) => (
            name,
            strip_optional(type_part.trim_end().trim_end_matches(')')),
        ),
        None => (signature, None),
    };

    let description = join_lines(first_line, rest);
    DocParam {
        type_name,
        default: description.as_deref().and_then(find_default),
        description,
        ..DocParam::new(name)
    }
}

fn returns(body: &[&str]) -> Option<DocReturns> {
    let text = super::dedent(body).join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| split_typed(text))
}
