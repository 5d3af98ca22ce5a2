//! Photo Date Sorter - move photos and videos into dated folders
//!
//! Runs the interactive progress screen on a terminal, or prints plain log
//! lines when `--plain` is given or output is redirected.

use anyhow::Result;
use chrono::Local;
use clap::{Parser, ValueEnum};
use photo_date_sorter::{
    Cli, Config, ConsoleObserver, Error, FolderFormat, RunSummary, TuiApp, naming,
    process::spawn_sort, should_run_interactive,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

mod cli_output {
    //! Colored summary output for the terminal

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    pub fn print_title(title: &str) {
        let _ = stdout().execute(Print(format!("{:^60}\n", title).bold()));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_stat(key: &str, value: &str, color: Color) {
        let _ = stdout().execute(Print(style(format!("  {:<10}", key)).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(style(value).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_log_path(path: &str) {
        let _ = stdout().execute(Print(style("  Log file: ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.list_formats {
        list_formats();
        return Ok(ExitCode::SUCCESS);
    }
    if cli.sample_config {
        print!("{}", Config::sample_config());
        return Ok(ExitCode::SUCCESS);
    }

    let exe_dir = get_executable_dir()?;
    let config = load_config(&cli, &exe_dir)?;

    if let Some(ref path) = cli.write_config {
        config.save_to_file(path)?;
        println!("Configuration written to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    validate_config(&config)?;

    let log_path = get_log_path(&exe_dir, &cli);
    let interactive = should_run_interactive(cli.plain);
    let _guard = if interactive {
        setup_file_only_logging(&cli, &config, &log_path)?
    } else {
        setup_logging(&cli, &config, &log_path)?
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        interactive,
        "Photo Date Sorter starting"
    );
    if config.verbose {
        info!(?config, "Configuration loaded");
    }
    info!(log_file = %log_path.display(), "Log file location");

    let result = if interactive {
        TuiApp::run(config)
    } else {
        spawn_sort(config, ConsoleObserver::default()).join()
    };

    // Returning (rather than exiting) lets the log guard flush
    match result {
        Ok(summary) => {
            print_summary(&summary, &log_path);
            info!(%summary, "Sort finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if let Some(message) = failure_message(&e) {
                error!(error = %e, "Sort failed");
                eprintln!("{}", message);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Message for a failed run, unless the engine already reported it on the log
fn failure_message(e: &Error) -> Option<String> {
    (!e.is_configuration()).then(|| format!("Error: {}", e))
}

fn list_formats() {
    for format in FolderFormat::ALL {
        let name = format
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_default();
        println!(
            "{:<16} {:<11} e.g. {}",
            name,
            format.label(),
            naming::preview(format)
        );
    }
}

fn print_summary(summary: &RunSummary, log_path: &Path) {
    use cli_output::*;

    print_separator();
    if summary.cancelled {
        print_title("Sorting cancelled");
    } else {
        print_title("Sorting complete");
    }
    print_separator();

    print_stat("Total", &summary.total.to_string(), CliTheme::ACCENT);
    print_stat("Moved", &summary.moved.to_string(), CliTheme::SUCCESS);
    print_stat("Skipped", &summary.skipped.to_string(), CliTheme::WARNING);
    print_stat("Failed", &summary.failed.to_string(), CliTheme::ERROR);

    if summary.cancelled {
        print_warning("Files not yet reached were left in the source folder.");
    }

    print_separator();
    print_log_path(&log_path.display().to_string());
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// `Log/Sort_<ts>.log`, or `Log/<name>/<name>_<ts>.log` with a config file
fn get_log_path(exe_dir: &Path, cli: &Cli) -> PathBuf {
    let log_dir = exe_dir.join("Log");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    match cli.config_name() {
        Some(config_name) => log_dir
            .join(&config_name)
            .join(format!("{}_{}.log", config_name, timestamp)),
        None => log_dir.join(format!("Sort_{}.log", timestamp)),
    }
}

/// Resolve config path: as given, with `.toml` appended, or under `<exe_dir>/Config`
fn resolve_config_path(exe_dir: &Path, config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    let with_extension = if config_path.extension().is_none() {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };
    if with_extension.exists() {
        return with_extension;
    }

    let filename = config_path.file_name().unwrap_or(config_path.as_os_str());
    let in_config_dir = exe_dir.join("Config").join(filename);
    let in_config_dir = if in_config_dir.extension().is_none() {
        in_config_dir.with_extension("toml")
    } else {
        in_config_dir
    };
    if in_config_dir.exists() {
        return in_config_dir;
    }

    config_path.to_path_buf()
}

/// Config file (if any) overlaid with CLI arguments
fn load_config(cli: &Cli, exe_dir: &Path) -> Result<Config> {
    let config = match cli.config {
        Some(ref config_path) => {
            let resolved_path = resolve_config_path(exe_dir, config_path);
            cli.merge_with_config(Config::load_from_file(&resolved_path)?)
        }
        None => cli.to_config(),
    };
    Ok(config)
}

/// Both folders are required; the engine checks they exist
fn validate_config(config: &Config) -> Result<()> {
    if config.source_dir.as_os_str().is_empty() {
        anyhow::bail!("No source folder given (use --source or set source_dir)");
    }
    if config.destination_dir.as_os_str().is_empty() {
        anyhow::bail!("No destination folder given (use --destination or set destination_dir)");
    }
    Ok(())
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?)
}

fn env_filter(verbose: bool) -> EnvFilter {
    let level = if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Plain mode: file plus stderr. Log lines already reach stdout, so stderr
/// only carries warnings and errors.
fn setup_logging(cli: &Cli, config: &Config, log_path: &Path) -> Result<Option<WorkerGuard>> {
    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);
    let subscriber = tracing_subscriber::registry().with(env_filter(config.verbose));

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(LevelFilter::WARN),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(LevelFilter::WARN),
            )
            .init();
    }

    Ok(Some(guard))
}

/// Interactive mode: file only, the terminal belongs to the progress screen
fn setup_file_only_logging(
    cli: &Cli,
    config: &Config,
    log_path: &Path,
) -> Result<Option<WorkerGuard>> {
    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);
    let subscriber = tracing_subscriber::registry().with(env_filter(config.verbose));

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(Some(guard))
}
