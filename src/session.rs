//! Application state shared by the UI: queue, options, run guard and log.
//!
//! A [`Session`] starts at most one worker run at a time. The worker gets a
//! snapshot of the queue and of the options when the run starts, so edits
//! made while it is running never reach it. When the run's completion signal
//! is observed by [`Session::poll`], the queue is cleared and the guard reset.

use std::{path::PathBuf, sync::Arc};
use tokio::{
    runtime::Handle,
    sync::oneshot::{self, error::TryRecvError},
};
use crate::{
    downloader::Fetcher,
    error::StartError,
    log_sink::{self, LogDrain, LogSink},
    model::{Options, RunState},
    queue::QueueStore,
    worker::{self, CurrentItem, RunReport},
};

pub const COMPLETION_MESSAGE: &str = "====== All downloads complete! Queue Cleared. ======";

/// Result of one [`Session::poll`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Log lines produced since the previous poll, oldest first
    pub lines: Vec<String>,
    /// Set on the poll that observed the end of a run
    pub finished: Option<RunReport>,
}

pub struct Session {
    queue: QueueStore,
    options: Options,
    run_state: RunState,
    sink: LogSink,
    drain: LogDrain,
    fetcher: Arc<dyn Fetcher>,
    runtime: Handle,
    current: CurrentItem,
    completion: Option<oneshot::Receiver<RunReport>>,
}

impl Session {
    pub fn new(options: Options, fetcher: Arc<dyn Fetcher>, runtime: Handle) -> Self {
        let (sink, drain) = log_sink::channel();
        Self {
            queue: QueueStore::new(),
            options,
            run_state: RunState::default(),
            sink,
            drain,
            fetcher,
            runtime,
            current: CurrentItem::default(),
            completion: None,
        }
    }

    pub fn queue(&self) -> &QueueStore {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut QueueStore {
        &mut self.queue
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_cookie_file(&mut self, path: PathBuf) {
        self.sink.log(format!("Cookie file set to: {}", path.display()));
        self.options.cookie_file = Some(path);
    }

    pub fn set_download_dir(&mut self, path: PathBuf) {
        self.sink.log(format!("Download folder set to: {}", path.display()));
        self.options.download_dir = path;
    }

    pub fn set_merge_enabled(&mut self, enabled: bool) {
        self.options.merge_enabled = enabled;
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running
    }

    /// Queue index the worker is on, if a run is active.
    pub fn current_index(&self) -> Option<usize> {
        if self.is_running() {
            self.current.get()
        } else {
            None
        }
    }

    /// Handle for writing to the user-facing log.
    pub fn log_sink(&self) -> LogSink {
        self.sink.clone()
    }

    /// Validates and launches a worker run over the current queue.
    ///
    /// Refusals leave every piece of state untouched.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.run_state.is_running {
            return Err(StartError::Busy);
        }
        if self.options.cookie_file.is_none() {
            return Err(StartError::MissingCookieFile);
        }
        if self.queue.is_empty() {
            return Err(StartError::EmptyQueue);
        }

        let items = self.queue.snapshot();
        let options = self.options.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let sink = self.sink.clone();
        let current = self.current.clone();
        let (done_tx, done_rx) = oneshot::channel();

        log::info!("Starting run over {} item(s)", items.len());
        self.run_state.is_running = true;
        self.completion = Some(done_rx);
        self.runtime.spawn(async move {
            let report = worker::run(items, options, fetcher, sink, current).await;
            let _ = done_tx.send(report);
        });
        Ok(())
    }

    /// Drains the log and checks for the end of the active run.
    pub fn poll(&mut self) -> SessionUpdate {
        let finished = self.check_completion();
        SessionUpdate {
            lines: self.drain.drain(),
            finished,
        }
    }

    fn check_completion(&mut self) -> Option<RunReport> {
        let rx = self.completion.as_mut()?;
        let report = match rx.try_recv() {
            Ok(report) => report,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => {
                log::error!("Worker ended without reporting; treating the run as finished");
                RunReport::default()
            }
        };
        self.finish_run();
        Some(report)
    }

    fn finish_run(&mut self) {
        self.completion = None;
        self.run_state.is_running = false;
        self.queue.clear();
        self.sink.log(COMPLETION_MESSAGE);
    }
}
