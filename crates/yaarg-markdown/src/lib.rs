//! Markdown block primitives.
//!
//! Generators emit their output as a sequence of finalized Markdown blocks.
//! Each block is assembled here:
//!
//! - [`MarkdownBlock`]: growable line buffer, finalized with [`MarkdownBlock::build`]
//! - [`heading`] / [`paragraph`]: one-shot block constructors
//! - [`Table`]: pipe table with a dashed separator row
//!
//! # Example
//!
//! ```
//! use yaarg_markdown::{MarkdownBlock, Table, heading};
//!
//! assert_eq!(heading("`add(a, b)`", 2), "## `add(a, b)`");
//!
//! let mut block = MarkdownBlock::new();
//! block.write("Hello, ").writeln("world!");
//! assert_eq!(block.build(), "Hello, world!");
//!
//! let table = Table::new(["Type", "Description"]).row(["int", "-"]).build();
//! assert_eq!(table, "| Type | Description |\n| ---- | ----------- |\n| int | - |");
//! ```

/// Line buffer for a single Markdown block.
///
/// [`write`](Self::write) extends the current (last) line in place;
/// [`writeln`](Self::writeln) terminates it and opens a new empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownBlock {
    lines: Vec<String>,
}

impl Default for MarkdownBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownBlock {
    /// Create an empty block holding a single empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Append text to the current line.
    pub fn write(&mut self, text: &str) -> &mut Self {
        if let Some(last) = self.lines.last_mut() {
            last.push_str(text);
        }
        self
    }

    /// Append text to the current line and start a new one.
    pub fn writeln(&mut self, line: &str) -> &mut Self {
        self.write(line);
        self.lines.push(String::new());
        self
    }

    /// Join the lines and strip leading/trailing line breaks.
    ///
    /// Interior blank lines are kept; only `\r` and `\n` are stripped at the
    /// edges, never other whitespace.
    #[must_use]
    pub fn build(&self) -> String {
        self.lines
            .join("\n")
            .trim_matches(|c| c == '\r' || c == '\n')
            .to_owned()
    }
}

/// Build a heading block: `"#" * level + " " + text`.
#[must_use]
pub fn heading(text: &str, level: usize) -> String {
    let mut block = MarkdownBlock::new();
    block.write(&"#".repeat(level)).write(" ").writeln(text);
    block.build()
}

/// Build a paragraph block from trimmed text.
#[must_use]
pub fn paragraph(text: &str) -> String {
    let mut block = MarkdownBlock::new();
    block.writeln(text.trim());
    block.build()
}

/// Escape text for use inside a pipe table cell.
///
/// Line breaks (with surrounding indentation) collapse into a single space and
/// `|` is backslash-escaped so the row stays on one line.
#[must_use]
pub fn escape_cell(text: &str) -> String {
    let collapsed = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    collapsed.replace('|', "\\|")
}

/// Pipe table assembled row by row.
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given column titles.
    #[must_use]
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Cells are written verbatim; escape them first if needed.
    #[must_use]
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(cells);
        self
    }

    /// Append a row in place.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Number of body rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no body rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render header, separator and body rows into a finalized block.
    ///
    /// Separator dashes match the width of each column title.
    #[must_use]
    pub fn build(&self) -> String {
        let mut block = MarkdownBlock::new();
        block.writeln(&format_row(&self.header));

        let separator: Vec<String> = self.header.iter().map(|h| "-".repeat(h.len())).collect();
        block.writeln(&format_row(&separator));

        for row in &self.rows {
            block.writeln(&format_row(row));
        }
        block.build()
    }
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_extends_current_line() {
        let mut block = MarkdownBlock::new();
        block.write("a").write("b").write("c");
        assert_eq!(block.build(), "abc");
    }

    #[test]
    fn test_writeln_opens_new_line() {
        let mut block = MarkdownBlock::new();
        block.writeln("first").write("second");
        assert_eq!(block.build(), "first\nsecond");
    }

    #[test]
    fn test_build_strips_outer_blank_lines_only() {
        let mut block = MarkdownBlock::new();
        block
            .writeln("")
            .writeln("")
            .writeln("top")
            .writeln("")
            .writeln("bottom")
            .writeln("");
        assert_eq!(block.build(), "top\n\nbottom");
    }

    #[test]
    fn test_build_keeps_edge_spaces() {
        let mut block = MarkdownBlock::new();
        block.writeln("  indented  ");
        assert_eq!(block.build(), "  indented  ");
    }

    #[test]
    fn test_build_strips_carriage_returns() {
        let mut block = MarkdownBlock::new();
        block.write("\r\ntext\r\n");
        assert_eq!(block.build(), "text");
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(MarkdownBlock::new().build(), "");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading("Title", 1), "# Title");
        assert_eq!(heading("Arguments", 3), "### Arguments");
    }

    #[test]
    fn test_heading_empty_text() {
        assert_eq!(heading("", 2), "## ");
    }

    #[test]
    fn test_paragraph_trims() {
        assert_eq!(paragraph("  Some prose.\n"), "Some prose.");
    }

    #[test]
    fn test_paragraph_keeps_interior_blank_lines() {
        assert_eq!(paragraph("One.\n\nTwo."), "One.\n\nTwo.");
    }

    #[test]
    fn test_table_build() {
        let table = Table::new(["Name", "Type", "Description", "Default"])
            .row(["a", "int", "First operand.", "-"])
            .row(["b", "int", "-", "1"]);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.build(),
            "| Name | Type | Description | Default |\n\
             | ---- | ---- | ----------- | ------- |\n\
             | a | int | First operand. | - |\n\
             | b | int | - | 1 |"
        );
    }

    #[test]
    fn test_table_without_rows() {
        let table = Table::new(["Type", "Description"]);
        assert!(table.is_empty());
        assert_eq!(table.build(), "| Type | Description |\n| ---- | ----------- |");
    }

    #[test]
    fn test_escape_cell_collapses_lines() {
        assert_eq!(
            escape_cell("The value to\n    add to the total."),
            "The value to add to the total."
        );
    }

    #[test]
    fn test_escape_cell_escapes_pipes() {
        assert_eq!(escape_cell("int | None"), "int \\| None");
    }
}
