//! CLI argument parsing with clap

use crate::config::{Config, ConflictPolicy, FolderFormat};
use clap::Parser;
use std::path::PathBuf;

/// Photo Date Sorter - move photos and videos into dated folders
///
/// Each file goes into a folder named after the date it was taken, read
/// from EXIF data, video metadata, or the file modification time.
#[derive(Parser, Debug)]
#[command(name = "photo-date-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Folder with the files to sort (not scanned recursively)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Folder that receives the dated subfolders
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Folder name format
    #[arg(short, long, value_enum)]
    pub format: Option<FolderFormat>,

    /// Quick mode: count raw directory entries for the progress bar
    #[arg(short, long)]
    pub quick: bool,

    /// What to do when the target folder already has a file with the same name
    #[arg(long, value_enum)]
    pub on_conflict: Option<ConflictPolicy>,

    /// Process files in name order instead of directory listing order
    #[arg(long)]
    pub sort_by_name: bool,

    /// Print log lines instead of the interactive progress screen
    #[arg(long)]
    pub plain: bool,

    /// List the folder name formats with an example and exit
    #[arg(long)]
    pub list_formats: bool,

    /// Print a commented sample configuration file and exit
    #[arg(long)]
    pub sample_config: bool,

    /// Write the effective configuration to this TOML file and exit
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref source) = self.source {
            config.source_dir = source.clone();
        }
        if let Some(ref destination) = self.destination {
            config.destination_dir = destination.clone();
        }
        if let Some(format) = self.format {
            config.folder_format = format;
        }
        if self.quick {
            config.quick_mode = true;
        }
        if let Some(policy) = self.on_conflict {
            config.on_conflict = policy;
        }
        if self.sort_by_name {
            config.sort_by_name = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_arguments() {
        let cli = Cli::parse_from(["photo-date-sorter", "-s", "/in", "-d", "/out"]);
        let config = cli.to_config();
        assert_eq!(config.source_dir, PathBuf::from("/in"));
        assert_eq!(config.destination_dir, PathBuf::from("/out"));
        assert_eq!(config.folder_format, FolderFormat::YearMonth);
        assert!(!config.quick_mode);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let file_config = Config {
            source_dir: PathBuf::from("/from/file"),
            destination_dir: PathBuf::from("/to/file"),
            folder_format: FolderFormat::YearMonthDay,
            ..Config::default()
        };

        let cli = Cli::parse_from([
            "photo-date-sorter",
            "--source",
            "/from/cli",
            "--format",
            "month-name-year",
            "--quick",
            "--on-conflict",
            "overwrite",
        ]);
        let config = cli.merge_with_config(file_config);

        assert_eq!(config.source_dir, PathBuf::from("/from/cli"));
        assert_eq!(config.destination_dir, PathBuf::from("/to/file"));
        assert_eq!(config.folder_format, FolderFormat::MonthNameYear);
        assert_eq!(config.on_conflict, ConflictPolicy::Overwrite);
        assert!(config.quick_mode);
    }

    #[test]
    fn test_config_name() {
        let cli = Cli::parse_from(["photo-date-sorter", "-C", "configs/camera.toml"]);
        assert_eq!(cli.config_name().as_deref(), Some("camera"));
    }
}
