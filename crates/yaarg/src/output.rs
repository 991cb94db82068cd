//! Terminal output: rendered Markdown on stdout, status on stderr.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
    green: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
            green: Style::new().green(),
            red: Style::new().red(),
        }
    }

    /// Write generated Markdown to stdout, ending with a newline.
    pub(crate) fn markdown(&self, text: &str) -> std::io::Result<()> {
        if text.ends_with('\n') {
            self.stdout.write_str(text)
        } else {
            self.stdout.write_line(text)
        }
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.red.apply_to(msg).to_string());
    }
}
