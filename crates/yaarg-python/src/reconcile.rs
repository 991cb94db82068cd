//! Signature and docstring reconciliation.
//!
//! Builds the Arguments and Returns tables of a function from two sources:
//! the documented entries and the signature. Documented values win; the
//! signature fills the gaps; `-` marks a value neither provides.

use yaarg_markdown::{Table, escape_cell};

use crate::docstring::Docstring;
use crate::tree::{Function, Parameter};

const MISSING: &str = "-";

/// One row of the Arguments table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentRow {
    /// Parameter name.
    pub name: String,
    /// Documented type, else annotation, else `-`.
    pub type_name: String,
    /// Documented description, else `-`.
    pub description: String,
    /// Documented default, else signature default, else `-`.
    pub default: String,
}

/// The single row of the Returns table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRow {
    /// Documented type, else return annotation, else `-`.
    pub type_name: String,
    /// Documented description, else `-`.
    pub description: String,
}

/// Argument rows: documented names in documented order, then the remaining
/// signature names in declared order. Each name appears once.
#[must_use]
pub fn argument_rows(function: &Function, doc: Option<&Docstring>) -> Vec<ArgumentRow> {
    let documented = doc.map(|doc| doc.params.as_slice()).unwrap_or_default();
    let declared: Vec<(&str, &Parameter)> = function
        .visible_params()
        .iter()
        .filter_map(|param| param.name.as_deref().map(|name| (name, param)))
        .collect();

    let mut names: Vec<&str> = Vec::new();
    for name in documented
        .iter()
        .map(|param| param.name.as_str())
        .chain(declared.iter().map(|(name, _)| *name))
    {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names
        .into_iter()
        .map(|name| {
            let doc_param = documented.iter().find(|param| param.name == name);
            let sig_param = declared
                .iter()
                .find(|(declared, _)| *declared == name)
                .map(|(_, param)| *param);

            ArgumentRow {
                name: name.to_owned(),
                type_name: pick(
                    doc_param.and_then(|param| param.type_name.as_deref()),
                    sig_param.and_then(|param| param.annotation.as_deref()),
                ),
                description: pick(doc_param.and_then(|param| param.description.as_deref()), None),
                default: pick(
                    doc_param.and_then(|param| param.default.as_deref()),
                    sig_param.and_then(|param| param.default.as_deref()),
                ),
            }
        })
        .collect()
}

/// Returns row from the documented entry and the return annotation.
#[must_use]
pub fn return_row(function: &Function, doc: Option<&Docstring>) -> ReturnRow {
    let returns = doc.and_then(|doc| doc.returns.as_ref());
    ReturnRow {
        type_name: pick(
            returns.and_then(|returns| returns.type_name.as_deref()),
            function.returns.as_deref(),
        ),
        description: pick(returns.and_then(|returns| returns.description.as_deref()), None),
    }
}

fn pick(primary: Option<&str>, fallback: Option<&str>) -> String {
    primary
        .filter(|text| !text.trim().is_empty())
        .or(fallback)
        .filter(|text| !text.trim().is_empty())
        .map_or_else(|| MISSING.to_owned(), escape_cell)
}

/// Render the Arguments table.
#[must_use]
pub fn arguments_table(rows: &[ArgumentRow]) -> String {
    rows.iter()
        .fold(
            Table::new(["Name", "Type", "Description", "Default"]),
            |table, row| {
                table.row([
                    escape_cell(&row.name),
                    row.type_name.clone(),
                    row.description.clone(),
                    row.default.clone(),
                ])
            },
        )
        .build()
}

/// Render the Returns table.
#[must_use]
pub fn returns_table(row: &ReturnRow) -> String {
    Table::new(["Type", "Description"])
        .row([row.type_name.as_str(), row.description.as_str()])
        .build()
}
