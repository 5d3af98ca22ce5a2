//! Photo Date Sorter - move photos and videos into dated folders
//!
//! Each file directly inside a source folder is moved into a destination
//! subfolder named after the date it was taken:
//! - EXIF `DateTimeOriginal` / `DateTime` for tagged image formats
//! - container creation time from FFprobe for videos
//! - the file modification time otherwise
//!
//! The engine runs sequentially, reports through a [`SortObserver`], and can
//! be paused, resumed, or cancelled through a shared [`RunState`].

pub mod cli;
pub mod config;
pub mod control;
pub mod error;
pub mod naming;
pub mod observer;
pub mod process;
pub mod time;
pub mod tui;

pub use cli::Cli;
pub use config::{Config, ConfigError, ConflictPolicy, ExtensionSet, FolderFormat, MediaKind};
pub use control::{RunState, RunSummary};
pub use error::{Error, Result};
pub use observer::{ChannelObserver, ConsoleObserver, SortEvent, SortObserver};
pub use process::{SortHandle, SortOutcome, Sorter, run_sort, spawn_sort};
pub use tui::{TuiApp, should_run_interactive};
