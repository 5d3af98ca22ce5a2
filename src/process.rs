//! Sorting engine
//!
//! Handles one run end to end:
//! - Counting eligible files (or raw entries in quick mode)
//! - Resolving a date per file
//! - Moving each file into its dated folder
//! - Reporting progress and honouring pause/cancel

use crate::config::{Config, ConflictPolicy, ExtensionSet};
use crate::control::{RunState, RunSummary};
use crate::error::{Error, Result};
use crate::naming::name_for;
use crate::observer::SortObserver;
use crate::time::resolve_date;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{Level, debug, error, info, span, warn};
use walkdir::WalkDir;

/// Terminal log line of a run that went through every file
pub const COMPLETE_MESSAGE: &str = "Sorting complete!";

/// Terminal log line of a cancelled run
pub const CANCELLED_MESSAGE: &str = "Process cancelled by the user.";

/// Result of handling a single eligible file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// File now lives in `destination_dir/<folder>/`
    Moved { source: PathBuf, folder: String },
    /// File left in place on purpose
    Skipped { source: PathBuf, reason: String },
    /// File left in place because something went wrong
    Failed { source: PathBuf, reason: String },
}

impl SortOutcome {
    pub fn source(&self) -> &Path {
        match self {
            SortOutcome::Moved { source, .. }
            | SortOutcome::Skipped { source, .. }
            | SortOutcome::Failed { source, .. } => source,
        }
    }
}

impl fmt::Display for SortOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .source()
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| self.source().to_string_lossy());
        match self {
            SortOutcome::Moved { folder, .. } => write!(f, "Moved: {} → {}", name, folder),
            SortOutcome::Skipped { reason, .. } => write!(f, "Skipped: {} — {}", name, reason),
            SortOutcome::Failed { reason, .. } => write!(f, "Failed: {} — {}", name, reason),
        }
    }
}

/// Sorting engine for one source/destination pair
#[derive(Debug, Clone)]
pub struct Sorter {
    config: Config,
    extensions: ExtensionSet,
}

impl Sorter {
    pub fn new(config: Config) -> Self {
        let extensions = config.extension_set();
        Self { config, extensions }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run to completion or cancellation.
    ///
    /// Only directory problems are returned as errors, before any file is
    /// touched. Per-file problems are reported as `Failed` log lines.
    pub fn run(&self, state: &RunState, observer: &mut dyn SortObserver) -> Result<RunSummary> {
        let _span = span!(Level::INFO, "sort_run").entered();

        if let Err(e) = self.validate() {
            info!(error = %e, "Cannot start sorting");
            observer.on_log(&format!("Error: {}", e), false);
            observer.on_finished(&state.summary());
            return Err(e);
        }

        info!(
            source = %self.config.source_dir.display(),
            destination = %self.config.destination_dir.display(),
            format = %self.config.folder_format,
            quick_mode = self.config.quick_mode,
            "Starting sort"
        );

        let Some(total) = self.count_files(state, observer) else {
            info!("Cancelled while counting files");
            return Ok(self.finish(state, observer, true));
        };
        state.total.store(total, Ordering::Relaxed);
        info!(total, "Counted files");

        let cancelled = self.process_files(state, observer);
        Ok(self.finish(state, observer, cancelled))
    }

    /// Both directories must exist and the source must be listable
    fn validate(&self) -> Result<()> {
        let source = &self.config.source_dir;
        let destination = &self.config.destination_dir;

        if !source.exists() {
            return Err(Error::SourceNotFound {
                path: source.clone(),
            });
        }
        if !source.is_dir() {
            return Err(Error::NotADirectory {
                path: source.clone(),
            });
        }
        if !destination.exists() {
            return Err(Error::DestinationNotFound {
                path: destination.clone(),
            });
        }
        if !destination.is_dir() {
            return Err(Error::NotADirectory {
                path: destination.clone(),
            });
        }

        fs::read_dir(source).map_err(|e| Error::SourceUnreadable {
            path: source.clone(),
            source: e,
        })?;

        Ok(())
    }

    /// Direct children of the source directory, in listing (or name) order
    fn listing(&self) -> walkdir::IntoIter {
        let walker = WalkDir::new(&self.config.source_dir)
            .min_depth(1)
            .max_depth(1);
        if self.config.sort_by_name {
            walker.sort_by_file_name().into_iter()
        } else {
            walker.into_iter()
        }
    }

    /// Regular file with a supported extension
    fn is_eligible(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| self.extensions.is_supported(ext))
    }

    /// Progress denominator. `None` if cancelled while counting.
    fn count_files(&self, state: &RunState, observer: &mut dyn SortObserver) -> Option<usize> {
        observer.on_log("Counting total number of files...", true);

        let total = if self.config.quick_mode {
            self.listing().count()
        } else {
            let mut total = 0;
            for entry in self.listing() {
                if state.is_cancelled() {
                    return None;
                }
                if let Ok(entry) = entry
                    && self.is_eligible(entry.path())
                {
                    total += 1;
                    observer.on_log(&format!("Counting files... Total so far: {}", total), true);
                }
            }
            total
        };

        if state.is_cancelled() {
            return None;
        }
        observer.on_log(&format!("Total number of files: {}", total), true);
        Some(total)
    }

    /// Move every eligible file. Returns `true` if the run was cancelled.
    fn process_files(&self, state: &RunState, observer: &mut dyn SortObserver) -> bool {
        let poll = Duration::from_millis(self.config.pause_poll_ms.max(1));

        for entry in self.listing() {
            let path = match entry {
                Ok(entry) => entry.into_path(),
                Err(e) => {
                    let source = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from("<unknown>"));
                    let reason = Error::from(e).to_string();
                    warn!(?source, %reason, "Could not read directory entry");
                    record(&SortOutcome::Failed { source, reason }, state, observer);
                    observer.on_progress(state.progress());
                    continue;
                }
            };

            if !self.is_eligible(&path) {
                continue;
            }

            if state.is_cancelled() {
                return true;
            }

            let outcome = self.sort_file(&path);
            record(&outcome, state, observer);
            observer.on_progress(state.progress());

            if state.is_cancelled() || state.wait_while_paused(poll) {
                return true;
            }
        }

        false
    }

    /// Resolve, name and move one file; never fails the run
    pub fn sort_file(&self, path: &Path) -> SortOutcome {
        let _span = span!(Level::DEBUG, "sort_file", ?path).entered();

        match self.try_sort_file(path) {
            Ok(outcome) => outcome,
            Err(e) => SortOutcome::Failed {
                source: path.to_path_buf(),
                reason: e.to_string(),
            },
        }
    }

    fn try_sort_file(&self, path: &Path) -> Result<SortOutcome> {
        let file_name = path.file_name().ok_or_else(|| Error::InvalidFileName {
            path: path.to_path_buf(),
        })?;

        let resolved = resolve_date(path, &self.extensions)?;
        let folder = name_for(&resolved.timestamp, self.config.folder_format);
        let target_dir = self.config.destination_dir.join(&folder);
        ensure_folder(&target_dir)?;

        let target = target_dir.join(file_name);
        if target.symlink_metadata().is_ok() {
            match self.config.on_conflict {
                ConflictPolicy::Skip => {
                    return Ok(SortOutcome::Skipped {
                        source: path.to_path_buf(),
                        reason: format!("already exists in {}", folder),
                    });
                }
                ConflictPolicy::Fail => {
                    return Err(Error::DestinationExists {
                        path: PathBuf::from(&folder),
                    });
                }
                ConflictPolicy::Overwrite => {
                    debug!(?target, "Overwriting existing file");
                }
            }
        }

        move_file(path, &target)?;
        debug!(
            ?path,
            ?target,
            source = ?resolved.source,
            timestamp = %resolved.timestamp,
            "Moved file"
        );

        Ok(SortOutcome::Moved {
            source: path.to_path_buf(),
            folder,
        })
    }

    fn finish(
        &self,
        state: &RunState,
        observer: &mut dyn SortObserver,
        cancelled: bool,
    ) -> RunSummary {
        if cancelled {
            observer.on_log(CANCELLED_MESSAGE, false);
        } else {
            observer.on_progress(state.progress());
            observer.on_log(COMPLETE_MESSAGE, false);
        }

        let summary = state.summary();
        info!(%summary, cancelled, "Sort finished");
        observer.on_finished(&summary);
        summary
    }
}

/// Update counters and emit the outcome's log line
fn record(outcome: &SortOutcome, state: &RunState, observer: &mut dyn SortObserver) {
    state.processed.fetch_add(1, Ordering::Relaxed);
    match outcome {
        SortOutcome::Moved { source, folder } => {
            state.moved.fetch_add(1, Ordering::Relaxed);
            info!(?source, %folder, "Moved");
        }
        SortOutcome::Skipped { source, reason } => {
            state.skipped.fetch_add(1, Ordering::Relaxed);
            warn!(?source, %reason, "Skipped");
        }
        SortOutcome::Failed { source, reason } => {
            state.failed.fetch_add(1, Ordering::Relaxed);
            error!(?source, %reason, "Failed");
        }
    }
    observer.on_log(&outcome.to_string(), false);
}

/// Create the folder if needed; an existing folder is fine
pub fn ensure_folder(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Move a file. Only a cross-device rename falls back to copy + delete.
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(?source, ?dest, "Different file systems, copying instead");
            copy_then_remove(source, dest)
        }
        Err(e) => Err(e.into()),
    }
}

/// Copy keeping the modification time, then delete the source
fn copy_then_remove(source: &Path, dest: &Path) -> Result<()> {
    copy_then_remove_with(source, dest, |path| fs::remove_file(path))
}

/// A source that cannot be deleted takes its copy with it, so the file
/// only ever lives in one place
fn copy_then_remove_with<F>(source: &Path, dest: &Path, remove: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let mtime = fs::metadata(source)?.modified()?;
    fs::copy(source, dest)?;
    if let Err(e) = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime)) {
        warn!(?dest, error = %e, "Could not keep modification time");
    }

    if let Err(e) = remove(source) {
        if let Err(cleanup) = fs::remove_file(dest) {
            error!(?dest, error = %cleanup, "Could not remove copy after failed move");
        }
        return Err(e.into());
    }
    Ok(())
}

/// Run a sort on the calling thread
pub fn run_sort(
    config: Config,
    state: &RunState,
    observer: &mut dyn SortObserver,
) -> Result<RunSummary> {
    Sorter::new(config).run(state, observer)
}

/// Start a sort on a background thread
pub fn spawn_sort<O>(config: Config, mut observer: O) -> SortHandle
where
    O: SortObserver + Send + 'static,
{
    let state = Arc::new(RunState::new());
    let worker = {
        let state = Arc::clone(&state);
        thread::spawn(move || run_sort(config, &state, &mut observer))
    };
    SortHandle { state, worker }
}

/// Handle on a background run
#[derive(Debug)]
pub struct SortHandle {
    state: Arc<RunState>,
    worker: JoinHandle<Result<RunSummary>>,
}

impl SortHandle {
    pub fn state(&self) -> &Arc<RunState> {
        &self.state
    }

    pub fn pause(&self) {
        self.state.pause();
    }

    pub fn resume(&self) {
        self.state.resume();
    }

    /// Returns `true` if the run is now paused
    pub fn toggle_pause(&self) -> bool {
        self.state.toggle_pause()
    }

    pub fn cancel(&self) {
        self.state.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the run to end
    pub fn join(self) -> Result<RunSummary> {
        self.worker.join().map_err(|_| Error::WorkerPanicked)?
    }
}
