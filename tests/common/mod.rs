use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use async_trait::async_trait;
use tokio::runtime::Handle;
use vod_downloader::{
    FetchError, FetchOptions, Fetcher, Options, ProgressEvent, ProgressHook, RunReport, Session,
};

/// Fetcher that fails for URLs containing "fail" and reports one
/// download + finished event for everything else.
#[derive(Default)]
pub struct ScriptedFetcher {
    pub calls: Mutex<Vec<(String, FetchOptions)>>,
}

impl ScriptedFetcher {
    pub fn urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
        hook: &dyn ProgressHook,
    ) -> Result<(), FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_owned(), options.clone()));
        if url.contains("fail") {
            hook.on_progress(ProgressEvent::Error {
                message: Some("HTTP Error 403".into()),
            });
            return Err(FetchError::Other(format!("could not fetch {url}")));
        }
        hook.on_message("[youtube] Extracting URL".into());
        hook.on_progress(ProgressEvent::Downloading {
            filename: format!("{url}.mp4"),
            percent: Some("50.0%".into()),
            speed: Some("1.00MiB/s".into()),
            eta: None,
        });
        hook.on_progress(ProgressEvent::Finished {
            filename: format!("{url}.mp4"),
        });
        Ok(())
    }
}

pub fn init_logging() {
    vod_downloader::logging::initialize_for_tests();
}

pub fn options_with_cookies(merge: bool) -> Options {
    Options {
        cookie_file: Some("/tmp/cookies.txt".into()),
        download_dir: "/tmp/vods".into(),
        merge_enabled: merge,
    }
}

pub fn session(options: Options) -> (Session, Arc<ScriptedFetcher>) {
    let fetcher = Arc::new(ScriptedFetcher::default());
    let session = Session::new(options, fetcher.clone(), Handle::current());
    (session, fetcher)
}

/// Polls until the active run finishes, returning every log line seen.
pub async fn finish_run(session: &mut Session) -> (Vec<String>, RunReport) {
    let mut lines = Vec::new();
    let waiting = async {
        loop {
            let update = session.poll();
            lines.extend(update.lines);
            if let Some(report) = update.finished {
                return report;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    let report = tokio::time::timeout(Duration::from_secs(5), waiting)
        .await
        .expect("run did not finish");
    (lines, report)
}
