//! Markdown preprocessing: expands `::: yaarg` directives in a document.

use crate::fence::FenceTracker;
use crate::{ApiReference, DirectiveError, Invocation};

const DIRECTIVE_MARKER: &str = ":::";
const DIRECTIVE_NAME: &str = "yaarg";

impl ApiReference {
    /// Replace every `::: yaarg <target>` block in `markdown` with its
    /// rendered API reference.
    ///
    /// The option block is the run of lines directly after the directive that
    /// are indented by four spaces or a tab. Directives inside fenced code are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::AtLine`] for the first directive that fails.
    pub fn preprocess(&mut self, markdown: &str) -> Result<String, DirectiveError> {
        let lines: Vec<&str> = markdown.lines().collect();
        let mut output: Vec<String> = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::new();
        let mut expanded = 0_usize;
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index];
            index += 1;

            let target = if fences.consume(line) {
                None
            } else {
                directive_target(line)
            };
            let Some(target) = target else {
                output.push(line.to_owned());
                continue;
            };

            let directive_line = index;
            let mut option_lines = Vec::new();
            while let Some(option_line) = lines.get(index).and_then(|line| strip_indent(line)) {
                option_lines.push(option_line);
                index += 1;
            }

            let rendered = Invocation::parse(target, &option_lines.join("\n"))
                .and_then(|invocation| self.render_markdown(&invocation))
                .map_err(|err| DirectiveError::AtLine {
                    line: directive_line,
                    source: Box::new(err),
                })?;

            if !rendered.is_empty() {
                output.push(rendered);
            }
            expanded += 1;
        }

        tracing::debug!(directives = expanded, "Preprocessed document");

        let mut result = output.join("\n");
        if markdown.ends_with('\n') {
            result.push('\n');
        }
        Ok(result)
    }
}

/// Target of a directive line, if the line is one.
fn directive_target(line: &str) -> Option<&str> {
    let rest = line.trim_end().strip_prefix(DIRECTIVE_MARKER)?.trim_start();
    let target = rest.strip_prefix(DIRECTIVE_NAME)?;
    if !target.starts_with(char::is_whitespace) {
        return None;
    }
    Some(target.trim()).filter(|target| !target.is_empty())
}

fn strip_indent(line: &str) -> Option<&str> {
    line.strip_prefix("    ").or_else(|| line.strip_prefix('\t'))
}
