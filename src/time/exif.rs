//! EXIF date extraction for images

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// EXIF tags to try for date extraction, in priority order
const DATE_TAGS: &[Tag] = &[
    Tag::DateTimeOriginal, // When the original image was taken
    Tag::DateTime,         // File change date/time
];

/// Fixed EXIF date pattern
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Read the capture date embedded in an image.
///
/// `Ok(None)` is an expected miss: the file has no EXIF block, no date tag,
/// or a tag that does not parse. `Err` is reserved for I/O failures.
pub fn read_exif_date(path: &Path) -> Result<Option<NaiveDateTime>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::Io(e)) => return Err(Error::Io(e)),
        Err(e) => {
            trace!(?path, error = %e, "No readable EXIF block");
            return Ok(None);
        }
    };

    for tag in DATE_TAGS {
        let Some(field) = exif.get_field(*tag, In::PRIMARY) else {
            continue;
        };
        if let Value::Ascii(ref values) = field.value
            && let Some(raw) = values.first()
            && let Some(datetime) = parse_exif_datetime(raw)
        {
            trace!(?path, ?tag, %datetime, "Found EXIF date");
            return Ok(Some(datetime));
        }
        trace!(?path, ?tag, "EXIF date tag present but unparseable");
    }

    Ok(None)
}

/// Parse an EXIF ASCII value in the form "YYYY:MM:DD HH:MM:SS"
fn parse_exif_datetime(raw: &[u8]) -> Option<NaiveDateTime> {
    let s = std::str::from_utf8(raw).ok()?;
    let s = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(s, EXIF_DATE_FORMAT).ok()
}

/// Minimal little-endian TIFF carrying one date tag, for tests across the crate.
/// `DateTime` (0x0132) lives in IFD0, the other date tags in the EXIF sub-IFD.
#[cfg(test)]
pub(crate) fn tiff_with_date_tag(tag: u16, value: &str) -> Vec<u8> {
    assert_eq!(value.len(), 19, "EXIF dates are 19 characters");

    fn entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
    }

    let mut out = Vec::new();
    // Header: byte order, magic, offset of IFD0
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());

    // Each single-entry IFD is 18 bytes
    if tag == 0x0132 {
        entry(&mut out, tag, 2, 20, 26);
    } else {
        entry(&mut out, 0x8769, 4, 1, 26);
        entry(&mut out, tag, 2, 20, 44);
    }

    out.extend_from_slice(value.as_bytes());
    out.push(0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use tempfile::tempdir;

    #[test]
    fn test_parse_exif_datetime() {
        let dt = parse_exif_datetime(b"2024:01:15 14:30:00").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 0);

        // Trailing NUL as stored on disk
        assert!(parse_exif_datetime(b"2024:01:15 14:30:00\0").is_some());

        // Blank dates written by some cameras
        assert!(parse_exif_datetime(b"    :  :     :  :  ").is_none());
        assert!(parse_exif_datetime(b"invalid").is_none());
    }

    #[test]
    fn test_reads_date_time_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.tif");
        std::fs::write(&path, tiff_with_date_tag(0x9003, "2019:07:04 10:20:30")).unwrap();

        let dt = read_exif_date(&path).unwrap().unwrap();
        assert_eq!(dt.to_string(), "2019-07-04 10:20:30");
    }

    #[test]
    fn test_falls_back_to_date_time_tag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.tif");
        std::fs::write(&path, tiff_with_date_tag(0x0132, "2011:02:03 04:05:06")).unwrap();

        let dt = read_exif_date(&path).unwrap().unwrap();
        assert_eq!(dt.year(), 2011);
        assert_eq!(dt.second(), 6);
    }

    #[test]
    fn test_no_exif_is_a_miss() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(read_exif_date(&path).unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read_exif_date(&dir.path().join("gone.jpg")).is_err());
    }
}
