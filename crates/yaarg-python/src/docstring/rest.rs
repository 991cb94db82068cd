//! reStructuredText style: `:param name:` field lists.

use super::{
    DocParam, DocReturns, Docstring, find_default, join_lines, split_description, strip_optional,
};

const PARAM_KEYS: &[&str] = &["param", "parameter", "arg", "argument", "key", "keyword"];
const RETURN_KEYS: &[&str] = &["returns", "return", "yields", "yield"];
const RETURN_TYPE_KEYS: &[&str] = &["rtype", "ytype"];
const OTHER_KEYS: &[&str] = &[
    "type", "raises", "raise", "except", "exception", "var", "ivar", "cvar", "vartype", "meta",
];

/// Whether `line` opens a known field (`:param x:`, `:returns:`, ...).
pub(super) fn is_field(line: &str) -> bool {
    field(line).is_some()
}

/// Split `:key args: text` into key tokens and text.
fn field(line: &str) -> Option<(Vec<&str>, &str)> {
    let inner = line.strip_prefix(':')?;
    let (key, text) = inner.split_once(':')?;
    let tokens: Vec<&str> = key.split_whitespace().collect();
    let first = *tokens.first()?;
    [PARAM_KEYS, RETURN_KEYS, RETURN_TYPE_KEYS, OTHER_KEYS]
        .iter()
        .any(|keys| keys.contains(&first))
        .then_some((tokens, text))
}

pub(super) fn parse(text: &str) -> Docstring {
    let lines: Vec<&str> = text.lines().collect();
    let description_end = lines
        .iter()
        .position(|line| is_field(line))
        .unwrap_or(lines.len());
    let (short_description, long_description) =
        split_description(&lines[..description_end].join("\n"));

    let mut doc = Docstring {
        short_description,
        long_description,
        ..Docstring::default()
    };
    let mut return_type: Option<String> = None;
    let mut return_description: Option<String> = None;

    let mut index = description_end;
    while index < lines.len() {
        let Some((tokens, first_line)) = field(lines[index]) else {
            index += 1;
            continue;
        };
        let end = lines[index + 1..]
            .iter()
            .position(|line| is_field(line))
            .map_or(lines.len(), |offset| index + 1 + offset);
        let rest: Vec<&str> = lines[index + 1..end].iter().map(|line| line.trim()).collect();
        let body = join_lines(first_line, &rest);
        index = end;

        match (tokens[0], tokens.len()) {
            (key, 2..) if PARAM_KEYS.contains(&key) => {
                let name = tokens[tokens.len() - 1];
                let declared_type = (tokens.len() > 2)
                    .then(|| tokens[1..tokens.len() - 1].join(" "))
                    .and_then(|t| strip_optional(&t));
                let param = param_entry(&mut doc.params, name);
                if declared_type.is_some() {
                    param.type_name = declared_type;
                }
                param.default = body.as_deref().and_then(find_default);
                param.description = body;
            }
            ("type", 2) => {
                param_entry(&mut doc.params, tokens[1]).type_name =
                    body.as_deref().and_then(strip_optional);
            }
            (key, 1) if RETURN_KEYS.contains(&key) => return_description = body,
            (key, 1) if RETURN_TYPE_KEYS.contains(&key) => return_type = body,
            _ => {}
        }
    }

    if return_type.is_some() || return_description.is_some() {
        doc.returns = Some(DocReturns {
            type_name: return_type,
            description: return_description,
        });
    }

    doc
}

fn param_entry<'a>(params: &'a mut Vec<DocParam>, name: &str) -> &'a mut DocParam {
    let probe = DocParam::new(name);
    let index = match params.iter().position(|param| param.name == probe.name) {
        Some(index) => index,
        None => {
            params.push(probe);
            params.len() - 1
        }
    };
    &mut params[index]
}
