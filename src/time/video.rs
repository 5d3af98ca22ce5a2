//! Video creation date extraction via FFprobe

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Local, NaiveDateTime, Utc};
use std::fs::File;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Metadata keys to try for creation date
const CREATION_DATE_KEYS: &[&str] = &[
    "creation_time",
    "com.apple.quicktime.creationdate",
    "date",
    "date_recorded",
];

/// QuickTime writes its epoch (1904) when the clock was never set
const FIRST_PLAUSIBLE_YEAR: i32 = 1970;

/// Cached FFprobe availability check
static FFPROBE_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Check if ffprobe is available (cached)
fn is_ffprobe_available() -> bool {
    *FFPROBE_AVAILABLE.get_or_init(|| Command::new("ffprobe").arg("-version").output().is_ok())
}

/// Read the creation date stored in a video container, in local time.
///
/// `Ok(None)` is an expected miss: ffprobe is not installed, does not
/// understand the container, or finds no creation date. `Err` means the
/// file could not be read or ffprobe could not be run at all.
pub fn read_video_date(path: &Path) -> Result<Option<NaiveDateTime>> {
    // Surface unreadable files as I/O errors before involving ffprobe
    File::open(path)?;

    if !is_ffprobe_available() {
        debug!(?path, error = %Error::FfprobeNotFound, "Skipping video metadata");
        return Ok(None);
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!("Failed to execute ffprobe: {}", e),
        })?;

    if !output.status.success() {
        trace!(
            ?path,
            stderr = %String::from_utf8_lossy(&output.stderr),
            "FFprobe could not read container"
        );
        return Ok(None);
    }

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let found = creation_date_from_ffprobe(&json);
    if let Some(utc) = found {
        debug!(?path, %utc, "Found video creation time");
    }

    Ok(found.map(|utc| utc.with_timezone(&Local).naive_local()))
}

/// Look for a creation date in ffprobe's JSON, format tags first, then streams
fn creation_date_from_ffprobe(json: &serde_json::Value) -> Option<DateTime<Utc>> {
    let format_tags = json.get("format").and_then(|f| f.get("tags"));
    let stream_tags = json
        .get("streams")
        .and_then(|s| s.as_array())
        .into_iter()
        .flatten()
        .filter_map(|stream| stream.get("tags"));

    format_tags
        .into_iter()
        .chain(stream_tags)
        .find_map(creation_date_from_tags)
}

fn creation_date_from_tags(tags: &serde_json::Value) -> Option<DateTime<Utc>> {
    CREATION_DATE_KEYS.iter().find_map(|key| {
        [key.to_string(), key.to_uppercase()]
            .iter()
            .filter_map(|k| tags.get(k).and_then(|v| v.as_str()))
            .find_map(parse_video_datetime)
    })
}

/// Parse a container timestamp; values without an offset are taken as UTC
pub(crate) fn parse_video_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    let parsed = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%z")
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        })
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y:%m:%d %H:%M:%S"]
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .map(|naive| naive.and_utc())
        })?;

    (parsed.year() >= FIRST_PLAUSIBLE_YEAR).then_some(parsed)
}
