//! Queue-driven front-end core for downloading stream VODs with yt-dlp.
//!
//! URLs are collected in a [`QueueStore`], a [`Session`] launches one
//! background worker per run, and everything the worker has to say goes
//! through a [`LogSink`] that the UI drains on a timer.

pub mod config;
pub mod downloader;
pub mod error;
pub mod log_sink;
pub mod logging;
pub mod model;
pub mod progress;
pub mod queue;
pub mod session;
pub mod worker;

pub use downloader::{Fetcher, ProgressHook, YtDlp};
pub use error::{ConfigError, FetchError, StartError};
pub use log_sink::{LogDrain, LogSink};
pub use model::{FetchOptions, FormatSelection, MergeMode, Options, RunState};
pub use progress::ProgressEvent;
pub use queue::QueueStore;
pub use session::{Session, SessionUpdate};
pub use worker::{CurrentItem, RunReport};
