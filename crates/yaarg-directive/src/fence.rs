//! Fenced code block tracking.
//!
//! Directives inside fenced code are documentation examples, not requests.

/// Open fence: marker character and run length.
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

/// Line-by-line tracker of `CommonMark` code fences (three or more backticks
/// or tildes). A fence closes on a run of the same marker at least as long as
/// the opening one, followed only by whitespace.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one line. Returns `true` if the line is inside a fence or is a
    /// fence delimiter.
    pub(crate) fn consume(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some(fence) => {
                if let Some(run) = marker_run(trimmed)
                    && run.marker == fence.marker
                    && run.len >= fence.len
                    && trimmed[run.len..].trim().is_empty()
                {
                    self.open = None;
                }
                true
            }
            None => {
                self.open = marker_run(trimmed);
                self.open.is_some()
            }
        }
    }
}

fn marker_run(trimmed: &str) -> Option<Fence> {
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    (len >= 3).then_some(Fence { marker, len })
}
