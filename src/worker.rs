//! The download worker: processes a queue snapshot one URL at a time.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use crate::{
    downloader::{Fetcher, ProgressHook},
    error::FetchError,
    log_sink::LogSink,
    model::{FetchOptions, MergeMode, Options},
    progress::ProgressEvent,
};

/// Outcome of a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Items attempted
    pub processed: usize,
    /// Items whose fetch returned an error
    pub failed: usize,
    /// Items where some playlist entries were saved and others failed
    pub incomplete: usize,
}

pub const INCOMPLETE_MESSAGE: &str =
    " > Completed with errors: some entries could not be downloaded.";

/// Index of the item currently being fetched, shared with the UI.
/// Holds `usize::MAX` when nothing is in flight.
#[derive(Debug, Clone)]
pub struct CurrentItem(Arc<AtomicUsize>);

impl Default for CurrentItem {
    fn default() -> Self {
        Self(Arc::new(AtomicUsize::new(usize::MAX)))
    }
}

impl CurrentItem {
    pub fn get(&self) -> Option<usize> {
        match self.0.load(Ordering::Relaxed) {
            usize::MAX => None,
            index => Some(index),
        }
    }

    fn set(&self, index: Option<usize>) {
        self.0.store(index.unwrap_or(usize::MAX), Ordering::Relaxed);
    }
}

/// Turns fetcher callbacks into log lines for one item.
struct ItemHook<'a> {
    sink: &'a LogSink,
    mode: MergeMode,
}

impl ProgressHook for ItemHook<'_> {
    fn on_progress(&self, event: ProgressEvent) {
        match event.describe() {
            Some(line) => self.sink.log(line),
            None => self.sink.log(self.mode.finished_message()),
        }
    }

    fn on_message(&self, message: String) {
        self.sink.log(message);
    }
}

/// Downloads every URL in order. A failing item is logged and skipped;
/// nothing aborts the run.
pub async fn run(
    items: Vec<String>,
    options: Options,
    fetcher: Arc<dyn Fetcher>,
    sink: LogSink,
    current: CurrentItem,
) -> RunReport {
    let mut report = RunReport::default();
    log::info!("Worker starting with {} queued item(s)", items.len());

    for (index, url) in items.iter().enumerate() {
        current.set(Some(index));
        sink.log(format!("--- Starting download for: {url} ---"));

        let mode = options.merge_mode();
        sink.log(mode.announcement());
        let fetch_options = FetchOptions::from_options(&options);
        let hook = ItemHook { sink: &sink, mode };

        match fetcher.fetch(url, &fetch_options, &hook).await {
            Ok(()) => {}
            Err(FetchError::Incomplete) => {
                sink.log(INCOMPLETE_MESSAGE);
                report.incomplete += 1;
            }
            Err(err) => {
                log::warn!("Fetch of {} failed: {}", url, err);
                sink.log(format!("!!! An unexpected error occurred: {err} !!!"));
                report.failed += 1;
            }
        }
        report.processed += 1;
        sink.log(format!("--- Finished processing: {url} ---"));
    }

    current.set(None);
    log::info!(
        "Worker finished: {} processed, {} failed, {} incomplete",
        report.processed,
        report.failed,
        report.incomplete
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_sink;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Emits one finished event and records the options it was handed.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<FetchOptions>>,
    }

    #[async_trait]
    impl Fetcher for Recording {
        async fn fetch(
            &self,
            _url: &str,
            options: &FetchOptions,
            hook: &dyn ProgressHook,
        ) -> Result<(), FetchError> {
            self.seen.lock().unwrap().push(options.clone());
            hook.on_progress(ProgressEvent::Finished {
                filename: "f.mp4".into(),
            });
            Ok(())
        }
    }

    fn options(merge: bool) -> Options {
        Options {
            cookie_file: Some("c.txt".into()),
            download_dir: "/out".into(),
            merge_enabled: merge,
        }
    }

    #[tokio::test]
    async fn finished_message_depends_on_mode() {
        for (merge, expected) in [
            (false, " > Download of stream complete."),
            (true, " > Download finished. Now merging formats if needed..."),
        ] {
            let (sink, mut drain) = log_sink::channel();
            let fetcher = Arc::new(Recording::default());
            run(
                vec!["u".into()],
                options(merge),
                fetcher.clone(),
                sink,
                CurrentItem::default(),
            )
            .await;
            assert!(drain.drain().iter().any(|l| l == expected));
            assert_eq!(fetcher.seen.lock().unwrap()[0].keep_intermediates, !merge);
        }
    }

    #[tokio::test]
    async fn current_item_is_cleared_after_run() {
        let (sink, _drain) = log_sink::channel();
        let current = CurrentItem::default();
        let report = run(
            vec!["a".into(), "b".into()],
            options(false),
            Arc::new(Recording::default()),
            sink,
            current.clone(),
        )
        .await;
        assert_eq!(
            report,
            RunReport {
                processed: 2,
                failed: 0,
                incomplete: 0
            }
        );
        assert_eq!(current.get(), None);
    }

    /// Reports a finished stream, then a partial playlist failure.
    struct PartlyFailing;

    #[async_trait]
    impl Fetcher for PartlyFailing {
        async fn fetch(
            &self,
            _url: &str,
            _options: &FetchOptions,
            hook: &dyn ProgressHook,
        ) -> Result<(), FetchError> {
            hook.on_progress(ProgressEvent::Finished {
                filename: "entry1.mp4".into(),
            });
            Err(FetchError::Incomplete)
        }
    }

    #[tokio::test]
    async fn partial_playlist_failure_gets_a_mild_line() {
        let (sink, mut drain) = log_sink::channel();
        let report = run(
            vec!["playlist".into()],
            options(false),
            Arc::new(PartlyFailing),
            sink,
            CurrentItem::default(),
        )
        .await;

        let lines = drain.drain();
        assert!(lines.iter().any(|l| l == INCOMPLETE_MESSAGE));
        assert!(!lines.iter().any(|l| l.starts_with("!!!")));
        assert_eq!(lines.last().map(String::as_str), Some("--- Finished processing: playlist ---"));
        assert_eq!(report.failed, 0);
        assert_eq!(report.incomplete, 1);
    }
}
