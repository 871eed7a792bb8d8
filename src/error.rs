//! Error types for the downloader core.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Failure of a single queue item. Never fatal to a run.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No usable yt-dlp executable could be found.
    #[error("yt-dlp executable not found")]
    MissingBinary,

    /// The yt-dlp process could not be started or its output could not be read.
    #[error("failed to run yt-dlp: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// yt-dlp exited unsuccessfully.
    #[error("yt-dlp exited with {}", exit_description(.code))]
    Exit { code: Option<i32> },

    /// yt-dlp saved at least one stream but some entries failed.
    #[error("yt-dlp completed with errors; some entries were not downloaded")]
    Incomplete,

    /// Any other failure reported by a fetcher implementation.
    #[error("{0}")]
    Other(String),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_owned(),
    }
}

/// Reasons a run is refused before it starts.
///
/// The `Display` text is what the user sees in the warning dialog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    #[error("A download is already in progress.")]
    Busy,

    #[error("Please select a cookies.txt file first.")]
    MissingCookieFile,

    #[error("Queue is empty. Add some URLs first.")]
    EmptyQueue,
}

/// Errors reading or writing the persisted settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed settings in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}
