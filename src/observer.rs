//! Progress and log reporting from the engine

use crate::control::RunSummary;
use std::sync::mpsc::Sender;
use tracing::info;

/// Receives engine events, synchronously, on the engine's worker thread.
///
/// Implementations that drive a UI should hand events off (see
/// [`ChannelObserver`]) rather than render from this thread.
pub trait SortObserver {
    /// A human readable log line. With `replace_last` set the line replaces
    /// the previous status line instead of being appended.
    fn on_log(&mut self, message: &str, replace_last: bool);

    /// Progress as a fraction in `0.0..=1.0`
    fn on_progress(&mut self, fraction: f64);

    /// The run has ended, normally or by cancellation
    fn on_finished(&mut self, _summary: &RunSummary) {}
}

/// Event forwarded by [`ChannelObserver`]
#[derive(Debug, Clone, PartialEq)]
pub enum SortEvent {
    Log { message: String, replace_last: bool },
    Progress(f64),
    Finished(RunSummary),
}

/// Forwards every event over an mpsc channel, preserving order
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: Sender<SortEvent>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<SortEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: SortEvent) {
        // Receiver gone means nobody is watching any more
        let _ = self.tx.send(event);
    }
}

impl SortObserver for ChannelObserver {
    fn on_log(&mut self, message: &str, replace_last: bool) {
        self.send(SortEvent::Log {
            message: message.to_string(),
            replace_last,
        });
    }

    fn on_progress(&mut self, fraction: f64) {
        self.send(SortEvent::Progress(fraction));
    }

    fn on_finished(&mut self, summary: &RunSummary) {
        self.send(SortEvent::Finished(*summary));
    }
}

/// Writes log lines to stdout and mirrors them into the tracing log.
/// Status lines (`replace_last`) only go to the tracing log.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    last_percent: Option<u32>,
}

impl SortObserver for ConsoleObserver {
    fn on_log(&mut self, message: &str, replace_last: bool) {
        info!(replace_last, "{}", message);
        if !replace_last {
            println!("{}", message);
        }
    }

    fn on_progress(&mut self, fraction: f64) {
        let percent = (fraction * 100.0).round() as u32;
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            info!(percent, "Progress");
        }
    }

    fn on_finished(&mut self, summary: &RunSummary) {
        info!(%summary, cancelled = summary.cancelled, "Run finished");
    }
}
