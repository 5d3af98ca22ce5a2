//! Configuration types for the photo date sorter

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Folder name format for dated subfolders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FolderFormat {
    /// YYYY-MM, e.g. 2024-08
    #[default]
    YearMonth,
    /// Month-YYYY, e.g. August-2024
    MonthNameYear,
    /// YYYY-MM-DD, e.g. 2024-08-17
    YearMonthDay,
}

impl FolderFormat {
    /// All built-in formats, in display order
    pub const ALL: [FolderFormat; 3] = [
        FolderFormat::YearMonth,
        FolderFormat::MonthNameYear,
        FolderFormat::YearMonthDay,
    ];

    /// chrono format pattern bound to this selector
    pub fn pattern(&self) -> &'static str {
        match self {
            FolderFormat::YearMonth => "%Y-%m",
            FolderFormat::MonthNameYear => "%B-%Y",
            FolderFormat::YearMonthDay => "%Y-%m-%d",
        }
    }

    /// Human readable label shown in selectors
    pub fn label(&self) -> &'static str {
        match self {
            FolderFormat::YearMonth => "YYYY-MM",
            FolderFormat::MonthNameYear => "Month-YYYY",
            FolderFormat::YearMonthDay => "YYYY-MM-DD",
        }
    }
}

impl fmt::Display for FolderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to do when the target folder already holds a file with the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Leave the source file where it is and report it as skipped
    #[default]
    Skip,
    /// Leave the source file where it is and report it as failed
    Fail,
    /// Replace the existing file at the destination
    Overwrite,
}

/// Media family of a file, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Image formats that can carry EXIF tags
    TaggedImage,
    /// Video containers
    Video,
    /// Supported images without an embedded-tag attempt (GIF, BMP, most RAW)
    Image,
}

/// Configuration for the photo date sorter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the unsorted files (not scanned recursively)
    pub source_dir: PathBuf,

    /// Directory that receives the dated subfolders
    pub destination_dir: PathBuf,

    /// Folder name format
    pub folder_format: FolderFormat,

    /// Count raw directory entries instead of eligible files
    pub quick_mode: bool,

    /// Behaviour when a same-named file already exists in the target folder
    pub on_conflict: ConflictPolicy,

    /// Process files sorted by name instead of directory listing order
    pub sort_by_name: bool,

    /// Poll interval of the pause wait, in milliseconds
    pub pause_poll_ms: u64,

    /// Verbose output
    pub verbose: bool,

    /// Image extensions read for EXIF dates
    pub exif_extensions: Vec<String>,

    /// Video extensions read for container creation dates
    pub video_extensions: Vec<String>,

    /// Other supported image extensions (file modification time only)
    pub image_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            destination_dir: PathBuf::new(),
            folder_format: FolderFormat::default(),
            quick_mode: false,
            on_conflict: ConflictPolicy::default(),
            sort_by_name: false,
            pause_poll_ms: 100,
            verbose: false,
            exif_extensions: to_strings(&[
                "jpg", "jpeg", "tif", "tiff", "heic", "heif", "png", "webp", "dng",
            ]),
            video_extensions: to_strings(&[
                "mp4", "mov", "avi", "mkv", "webm", "flv", "wmv", "m4v", "mpeg", "mpg", "3gp",
            ]),
            image_extensions: to_strings(&[
                "gif", "bmp", "raf", "cr2", "rw2", "erf", "nrw", "nef", "rwz", "arw", "eip",
                "bay", "dcr", "gpr", "raw", "crw", "3fr", "sr2", "k25", "mef", "kc2", "cs1",
                "mos", "orf", "kdc", "cr3", "srf", "srw", "j6i", "ari", "fff", "mrw", "mfw",
                "rwl", "x3f", "pef", "iiq", "cxi", "nksc",
            ]),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Inline TOML array of strings
fn toml_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", quoted.join(", "))
}

impl Config {
    /// Build the immutable extension lookup used for one run
    pub fn extension_set(&self) -> ExtensionSet {
        ExtensionSet::new(
            &self.exif_extensions,
            &self.video_extensions,
            &self.image_extensions,
        )
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError { source: e })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        let defaults = Config::default();
        format!(
            r#"# Photo Date Sorter Configuration File
# This file uses TOML format (https://toml.io)

# Folder with the unsorted photos and videos (subfolders are not scanned)
source_dir = "D:/ImportedPhotos"

# Folder that receives the dated subfolders
destination_dir = "D:/Sorted"

# Folder name format: "year-month", "month-name-year" or "year-month-day"
# - year-month:      2024-08
# - month-name-year: August-2024
# - year-month-day:  2024-08-17
folder_format = "year-month"

# Quick mode counts every directory entry for the progress bar instead of
# pre-scanning for supported files. Faster, but the bar may not reach 100%.
quick_mode = false

# Same-named file already in the target folder: "skip", "fail" or "overwrite"
on_conflict = "skip"

# Process files in name order instead of directory listing order
sort_by_name = false

# How often a paused run checks for resume/cancel, in milliseconds
pause_poll_ms = 100

# Verbose output - show detailed processing information
verbose = false

# Supported file extensions (customize as needed)
exif_extensions = {}
video_extensions = {}
image_extensions = {}
"#,
            toml_list(&defaults.exif_extensions),
            toml_list(&defaults.video_extensions),
            toml_list(&defaults.image_extensions),
        )
    }
}

/// Lower-cased lookup of supported extensions, fixed for the duration of a run
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet {
    tagged: HashSet<String>,
    video: HashSet<String>,
    image: HashSet<String>,
}

impl ExtensionSet {
    pub fn new(tagged: &[String], video: &[String], image: &[String]) -> Self {
        let normalize = |values: &[String]| -> HashSet<String> {
            values
                .iter()
                .map(|v| v.trim_start_matches('.').to_lowercase())
                .collect()
        };

        Self {
            tagged: normalize(tagged),
            video: normalize(video),
            image: normalize(image),
        }
    }

    /// Classify an extension (without the dot, any case)
    pub fn kind_of(&self, ext: &str) -> Option<MediaKind> {
        let ext = ext.to_lowercase();
        if self.tagged.contains(&ext) {
            Some(MediaKind::TaggedImage)
        } else if self.video.contains(&ext) {
            Some(MediaKind::Video)
        } else if self.image.contains(&ext) {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    pub fn is_supported(&self, ext: &str) -> bool {
        self.kind_of(ext).is_some()
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize configuration
    SerializeError { source: toml::ser::Error },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::WriteError { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path.display(), source)
            }
            ConfigError::SerializeError { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::WriteError { source, .. } => Some(source),
            ConfigError::SerializeError { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        let set = Config::default().extension_set();
        assert_eq!(set.kind_of("JPG"), Some(MediaKind::TaggedImage));
        assert_eq!(set.kind_of("Mov"), Some(MediaKind::Video));
        assert_eq!(set.kind_of("nef"), Some(MediaKind::Image));
        assert_eq!(set.kind_of("txt"), None);
        assert!(!set.is_supported(""));
    }

    #[test]
    fn test_extension_set_strips_leading_dot() {
        let set = ExtensionSet::new(&[".JPG".into()], &[], &[]);
        assert!(set.is_supported("jpg"));
        assert_eq!(set.kind_of("mov"), None);
    }

    #[test]
    fn test_every_format_has_pattern_and_label() {
        for format in FolderFormat::ALL {
            assert!(!format.pattern().is_empty());
            assert!(!format.label().is_empty());
        }
        assert_eq!(FolderFormat::default(), FolderFormat::YearMonth);
        assert_eq!(FolderFormat::MonthNameYear.to_string(), "Month-YYYY");
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::sample_config()).unwrap();
        assert_eq!(config.folder_format, FolderFormat::YearMonth);
        assert_eq!(config.on_conflict, ConflictPolicy::Skip);
        assert_eq!(config.pause_poll_ms, 100);
        assert!(config.extension_set().is_supported("mp4"));

        let defaults = Config::default();
        assert_eq!(config.exif_extensions, defaults.exif_extensions);
        assert_eq!(config.video_extensions, defaults.video_extensions);
        assert_eq!(config.image_extensions, defaults.image_extensions);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sorter.toml");

        let config = Config {
            source_dir: PathBuf::from("/photos/in"),
            destination_dir: PathBuf::from("/photos/out"),
            folder_format: FolderFormat::YearMonthDay,
            quick_mode: true,
            on_conflict: ConflictPolicy::Overwrite,
            ..Config::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.source_dir, config.source_dir);
        assert_eq!(loaded.folder_format, FolderFormat::YearMonthDay);
        assert_eq!(loaded.on_conflict, ConflictPolicy::Overwrite);
        assert!(loaded.quick_mode);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("folder_format = \"month-name-year\"").unwrap();
        assert_eq!(config.folder_format, FolderFormat::MonthNameYear);
        assert!(!config.quick_mode);
        assert!(!config.video_extensions.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
