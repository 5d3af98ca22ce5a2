//! Ratatui progress screen
//!
//! Shows the live log, a progress gauge, and pause/cancel controls while a
//! sort runs on a worker thread.

pub mod app;
pub mod components;
pub mod event;
pub mod state;
pub mod theme;
pub mod ui;

pub use app::TuiApp;
pub use event::{EventPoll, TuiEvent};
pub use state::ProgressView;
pub use theme::{Theme, theme};

use std::io::IsTerminal;

/// Use the progress screen only on an interactive terminal
pub fn should_run_interactive(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal() && std::io::stdin().is_terminal()
}
