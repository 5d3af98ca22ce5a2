//! TUI application main module
//!
//! Runs the sort on a worker thread and drives the progress screen from its
//! events. Rendering and key handling stay on this thread.

use crate::config::Config;
use crate::control::RunSummary;
use crate::observer::{ChannelObserver, SortEvent};
use crate::process::{SortHandle, spawn_sort};
use crate::tui::event::{EventPoll, TuiEvent};
use crate::tui::state::ProgressView;
use crate::tui::ui::render;
use ratatui::DefaultTerminal;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use tracing::info;

pub const PAUSED_NOTICE: &str = "Process paused.";
pub const RESUMED_NOTICE: &str = "Process resumed.";
pub const CANCELLING_NOTICE: &str = "Cancelling process...";

/// What a key press asks of the running sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    TogglePause,
    Cancel,
    Exit,
}

/// Interactive progress screen for one run
#[derive(Debug)]
pub struct TuiApp {
    view: ProgressView,
    event_poll: EventPoll,
}

impl TuiApp {
    pub fn new(config: &Config) -> Self {
        Self {
            view: ProgressView::new(config),
            event_poll: EventPoll::default(),
        }
    }

    /// Sort with the progress screen, returning once the user leaves it
    pub fn run(config: Config) -> crate::Result<RunSummary> {
        let mut app = Self::new(&config);
        let (tx, rx) = mpsc::channel();
        let handle = spawn_sort(config, ChannelObserver::new(tx));

        let mut terminal = ratatui::init();
        let outcome = app.event_loop(&mut terminal, &handle, &rx);
        ratatui::restore();

        // Leaving early (terminal error) must not orphan the worker
        if outcome.is_err() {
            handle.cancel();
        }
        let summary = handle.join();
        outcome?;
        summary
    }

    fn event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        handle: &SortHandle,
        rx: &Receiver<SortEvent>,
    ) -> std::io::Result<()> {
        loop {
            self.drain(rx);
            render(terminal, &self.view, &handle.state().summary())?;

            let action = match self.event_poll.next() {
                TuiEvent::None | TuiEvent::Resize(_, _) => Action::None,
                event => self.handle_event(event),
            };

            match action {
                Action::None => {}
                Action::TogglePause => {
                    self.view.paused = handle.toggle_pause();
                    let notice = if self.view.paused {
                        PAUSED_NOTICE
                    } else {
                        RESUMED_NOTICE
                    };
                    info!("{}", notice);
                    self.view.notice(notice);
                }
                Action::Cancel => {
                    info!("{}", CANCELLING_NOTICE);
                    self.view.paused = false;
                    self.view.cancelling = true;
                    self.view.notice(CANCELLING_NOTICE);
                    handle.cancel();
                }
                Action::Exit => return Ok(()),
            }
        }
    }

    /// Apply every event the worker has queued so far
    fn drain(&mut self, rx: &Receiver<SortEvent>) {
        loop {
            match rx.try_recv() {
                Ok(event) => self.view.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Worker is gone; a missing Finished means it died early
                    if !self.view.is_finished() {
                        self.view.summary = Some(RunSummary {
                            cancelled: true,
                            ..RunSummary::default()
                        });
                    }
                    break;
                }
            }
        }
    }

    /// Map a key to an action given the current screen state
    pub fn handle_event(&mut self, event: TuiEvent) -> Action {
        if self.view.is_finished() {
            return match event {
                TuiEvent::Enter | TuiEvent::Escape | TuiEvent::CtrlC | TuiEvent::Char('q') => {
                    Action::Exit
                }
                _ => Action::None,
            };
        }

        if event == TuiEvent::CtrlC {
            self.view.confirm_cancel = false;
            return if self.view.cancelling {
                Action::None
            } else {
                Action::Cancel
            };
        }

        if self.view.confirm_cancel {
            return match event {
                TuiEvent::Char('y') | TuiEvent::Enter => {
                    self.view.confirm_cancel = false;
                    Action::Cancel
                }
                TuiEvent::Char('n') | TuiEvent::Escape => {
                    self.view.confirm_cancel = false;
                    Action::None
                }
                _ => Action::None,
            };
        }

        if self.view.cancelling {
            return Action::None;
        }

        match event {
            TuiEvent::Char('p') | TuiEvent::Char(' ') => Action::TogglePause,
            TuiEvent::Char('c') | TuiEvent::Escape => {
                self.view.confirm_cancel = true;
                Action::None
            }
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TuiApp {
        TuiApp::new(&Config::default())
    }

    #[test]
    fn test_cancel_needs_confirmation() {
        let mut app = app();
        assert_eq!(app.handle_event(TuiEvent::Char('c')), Action::None);
        assert!(app.view.confirm_cancel);

        assert_eq!(app.handle_event(TuiEvent::Char('n')), Action::None);
        assert!(!app.view.confirm_cancel);

        app.handle_event(TuiEvent::Escape);
        assert_eq!(app.handle_event(TuiEvent::Char('y')), Action::Cancel);
    }

    #[test]
    fn test_ctrl_c_cancels_immediately() {
        let mut app = app();
        assert_eq!(app.handle_event(TuiEvent::CtrlC), Action::Cancel);

        app.view.cancelling = true;
        assert_eq!(app.handle_event(TuiEvent::CtrlC), Action::None);
        assert_eq!(app.handle_event(TuiEvent::Char('p')), Action::None);
    }

    #[test]
    fn test_pause_keys() {
        let mut app = app();
        assert_eq!(app.handle_event(TuiEvent::Char('p')), Action::TogglePause);
        assert_eq!(app.handle_event(TuiEvent::Char(' ')), Action::TogglePause);
        assert_eq!(app.handle_event(TuiEvent::Char('q')), Action::None);
    }

    #[test]
    fn test_exit_only_after_finish() {
        let mut app = app();
        assert_eq!(app.handle_event(TuiEvent::Enter), Action::None);

        app.view.apply(SortEvent::Finished(RunSummary::default()));
        assert_eq!(app.handle_event(TuiEvent::Char('q')), Action::Exit);
        assert_eq!(app.handle_event(TuiEvent::Escape), Action::Exit);
    }

    #[test]
    fn test_drain_applies_queued_events() {
        let mut app = app();
        let (tx, rx) = mpsc::channel();
        tx.send(SortEvent::Progress(0.25)).unwrap();
        tx.send(SortEvent::Log {
            message: "Moved: a.jpg → 2024-01".into(),
            replace_last: false,
        })
        .unwrap();
        drop(tx);

        app.drain(&rx);
        assert_eq!(app.view.ratio, 0.25);
        assert_eq!(app.view.lines.len(), 1);
        // Disconnected without Finished
        assert!(app.view.is_finished());
    }
}
