//! Date resolution
//!
//! Picks one "date taken" per file from, in order:
//! - EXIF metadata for images that carry tags
//! - Container metadata for videos (via FFprobe)
//! - File system modification time, in local time
//!
//! The first source that answers wins; later sources are not consulted.

pub mod exif;
pub mod video;

use crate::config::{ExtensionSet, MediaKind};
use crate::error::Result;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Source of the resolved date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Embedded EXIF tag
    Exif,
    /// Video container metadata
    VideoMetadata,
    /// File system modification time
    FileSystem,
}

/// The single date chosen for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    /// Calendar timestamp in local time
    pub timestamp: NaiveDateTime,
    /// Where it came from
    pub source: DateSource,
}

/// Embedded image date, or `None` on any miss or error
pub fn resolve_image_date(path: &Path) -> Option<NaiveDateTime> {
    match exif::read_exif_date(path) {
        Ok(Some(time)) => Some(time),
        Ok(None) => {
            debug!(?path, "No EXIF date found");
            None
        }
        Err(e) => {
            warn!(?path, error = %e, "Could not read EXIF data");
            None
        }
    }
}

/// Embedded video date, or `None` on any miss or error
pub fn resolve_video_date(path: &Path) -> Option<NaiveDateTime> {
    match video::read_video_date(path) {
        Ok(Some(time)) => Some(time),
        Ok(None) => {
            debug!(?path, "No video creation date found");
            None
        }
        Err(e) => {
            warn!(?path, error = %e, "Could not read video metadata");
            None
        }
    }
}

/// Resolve the date used to name the folder for `path`.
///
/// Metadata misses never fail; the only error is the modification-time
/// fallback itself failing, e.g. when the file disappeared mid-run.
pub fn resolve_date(path: &Path, extensions: &ExtensionSet) -> Result<ResolvedDate> {
    let kind = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| extensions.kind_of(ext));

    let embedded = match kind {
        Some(MediaKind::TaggedImage) => {
            resolve_image_date(path).map(|t| (t, DateSource::Exif))
        }
        Some(MediaKind::Video) => {
            resolve_video_date(path).map(|t| (t, DateSource::VideoMetadata))
        }
        Some(MediaKind::Image) | None => None,
    };

    if let Some((timestamp, source)) = embedded {
        debug!(?path, ?source, %timestamp, "Resolved embedded date");
        return Ok(ResolvedDate { timestamp, source });
    }

    let timestamp = modified_local(path)?;
    debug!(?path, %timestamp, "Using file system modification time");

    Ok(ResolvedDate {
        timestamp,
        source: DateSource::FileSystem,
    })
}

/// File modification time converted to local calendar time
pub fn modified_local(path: &Path) -> Result<NaiveDateTime> {
    let modified = fs::metadata(path)?.modified()?;
    let local: DateTime<Local> = modified.into();
    Ok(local.naive_local())
}
