//! Progress screen state

use crate::config::Config;
use crate::control::RunSummary;
use crate::naming::preview;
use crate::observer::SortEvent;
use std::collections::VecDeque;

/// Oldest lines are dropped past this many
const MAX_LOG_LINES: usize = 2000;

/// Colour class of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Moved,
    Skipped,
    Failed,
}

impl LineKind {
    fn of(message: &str) -> Self {
        if message.starts_with("Moved:") {
            LineKind::Moved
        } else if message.starts_with("Skipped:") {
            LineKind::Skipped
        } else if message.starts_with("Failed:") || message.starts_with("Error:") {
            LineKind::Failed
        } else {
            LineKind::Info
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub kind: LineKind,
}

/// Everything the progress screen renders
#[derive(Debug)]
pub struct ProgressView {
    pub source: String,
    pub destination: String,
    /// Format label plus today's example, e.g. "YYYY-MM (2024-08)"
    pub format: String,
    pub lines: VecDeque<LogLine>,
    /// The last line is a status line that the next status update replaces
    last_is_status: bool,
    pub ratio: f64,
    pub paused: bool,
    pub confirm_cancel: bool,
    pub cancelling: bool,
    pub summary: Option<RunSummary>,
}

impl ProgressView {
    pub fn new(config: &Config) -> Self {
        Self {
            source: config.source_dir.display().to_string(),
            destination: config.destination_dir.display().to_string(),
            format: format!(
                "{} ({})",
                config.folder_format.label(),
                preview(config.folder_format)
            ),
            lines: VecDeque::new(),
            last_is_status: false,
            ratio: 0.0,
            paused: false,
            confirm_cancel: false,
            cancelling: false,
            summary: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    /// Apply one engine event
    pub fn apply(&mut self, event: SortEvent) {
        match event {
            SortEvent::Log {
                message,
                replace_last,
            } => self.log(message, replace_last),
            SortEvent::Progress(fraction) => self.ratio = fraction.clamp(0.0, 1.0),
            SortEvent::Finished(summary) => {
                self.summary = Some(summary);
                self.paused = false;
                self.confirm_cancel = false;
            }
        }
    }

    /// Append a line, or overwrite the status line when `replace_last` is set
    pub fn log(&mut self, message: String, replace_last: bool) {
        let line = LogLine {
            kind: LineKind::of(&message),
            text: message,
        };

        if replace_last
            && self.last_is_status
            && let Some(last) = self.lines.back_mut()
        {
            *last = line;
            return;
        }

        self.lines.push_back(line);
        self.last_is_status = replace_last;
        if self.lines.len() > MAX_LOG_LINES {
            self.lines.pop_front();
        }
    }

    /// Local notice from the screen itself (pause, resume, cancel)
    pub fn notice(&mut self, message: &str) {
        self.log(message.to_string(), false);
    }
}
