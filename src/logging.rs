//! Diagnostic logging, separate from the user-facing log panel.
//!
//! Writes to the terminal and to `vod_downloader.log` in the platform data
//! directory.

use std::{fs::File, path::PathBuf};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILENAME: &str = "vod_downloader.log";

/// Installs the global logger. Safe to call more than once.
pub fn initialize() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(file_logger) = create_file_logger(level, config) {
        loggers.push(file_logger);
    }

    let _ = CombinedLogger::init(loggers);
}

/// Terminal-only logger for tests; no-ops if one is already installed.
pub fn initialize_for_tests() {
    let _ = CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("vod_downloader")
        .build()
}

fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("vod_downloader"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILENAME)
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match File::create(&path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
