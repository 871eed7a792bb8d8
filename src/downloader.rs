//! The external fetch-and-save collaborator.
//!
//! [`Fetcher`] is the seam the worker talks to. [`YtDlp`] is the production
//! implementation, driving the `yt-dlp` executable as a child process.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::Stdio,
    sync::atomic::{AtomicBool, Ordering},
};
use async_trait::async_trait;
use rust_embed::RustEmbed;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};
use crate::{
    error::FetchError,
    model::FetchOptions,
    progress::{PROGRESS_TEMPLATE, ProgressEvent, ToolOutput, parse_output_line},
};

#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Asset;

const BINARY_NAME: &str = if cfg!(target_os = "windows") { "yt-dlp.exe" } else { "yt-dlp" };

/// Receives everything a fetcher reports while working on one URL.
pub trait ProgressHook: Send + Sync {
    /// Status event (`downloading`, `finished`, `error`).
    fn on_progress(&self, event: ProgressEvent);
    /// Free-form output from the fetch tool, already formatted for the log.
    fn on_message(&self, message: String);
}

/// Fetches a URL (possibly a playlist) and saves the result to disk.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
        hook: &dyn ProgressHook,
    ) -> Result<(), FetchError>;
}

/// Runs `yt-dlp` once per URL.
#[derive(Debug, Clone, Default)]
pub struct YtDlp {
    /// Explicit executable; otherwise the bundled copy, then `PATH`
    binary: Option<PathBuf>,
}

impl YtDlp {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self { binary }
    }

    fn resolve_binary(&self) -> Result<PathBuf, FetchError> {
        if let Some(path) = &self.binary {
            return Ok(path.clone());
        }
        if let Some(path) = extract_embedded()? {
            return Ok(path);
        }
        which::which(BINARY_NAME).map_err(|_| FetchError::MissingBinary)
    }
}

/// Writes the bundled yt-dlp to the temp dir once. `None` when nothing is bundled.
fn extract_embedded() -> Result<Option<PathBuf>, FetchError> {
    let Some(data) = Asset::get(BINARY_NAME) else {
        return Ok(None);
    };
    let tmp = std::env::temp_dir().join(BINARY_NAME);
    if !tmp.exists() {
        log::info!("Extracting bundled {} to {:?}", BINARY_NAME, tmp);
        let mut f = File::create(&tmp)?;
        f.write_all(&data.data)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o755))?;
        }
    }
    Ok(Some(tmp))
}

/// Command-line arguments for one invocation.
pub fn build_args(url: &str, options: &FetchOptions) -> Vec<String> {
    let mut args = vec!["-o".to_owned(), options.output_template.clone()];

    if let Some(cookies) = &options.cookie_file {
        args.push("--cookies".to_owned());
        args.push(path_arg(cookies));
    }
    args.push(if options.expand_playlists { "--yes-playlist" } else { "--no-playlist" }.to_owned());
    if options.ignore_errors {
        args.push("--ignore-errors".to_owned());
    }

    args.push("-f".to_owned());
    args.push(options.format.selector().to_owned());
    if options.keep_intermediates {
        args.push("-k".to_owned());
    }

    args.push("--encoding".to_owned());
    args.push("utf-8".to_owned());
    args.push("--newline".to_owned());
    args.push("--progress-template".to_owned());
    args.push(PROGRESS_TEMPLATE.to_owned());
    args.push(url.to_owned());
    args
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Wraps the caller's hook to remember whether any stream finished.
struct TrackingHook<'a> {
    inner: &'a dyn ProgressHook,
    finished: AtomicBool,
}

impl ProgressHook for TrackingHook<'_> {
    fn on_progress(&self, event: ProgressEvent) {
        if matches!(event, ProgressEvent::Finished { .. }) {
            self.finished.store(true, Ordering::Relaxed);
        }
        self.inner.on_progress(event);
    }

    fn on_message(&self, message: String) {
        self.inner.on_message(message);
    }
}

/// Forwards output line by line. Bytes that are not UTF-8 are replaced,
/// never treated as a read error.
async fn forward_lines<R>(reader: R, hook: &dyn ProgressHook) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        match parse_output_line(line.trim_end_matches(['\r', '\n'])) {
            ToolOutput::Progress(event) => hook.on_progress(event),
            ToolOutput::Message(message) => hook.on_message(message),
            ToolOutput::Ignored => {}
        }
    }
}

#[async_trait]
impl Fetcher for YtDlp {
    async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
        hook: &dyn ProgressHook,
    ) -> Result<(), FetchError> {
        let bin = self.resolve_binary()?;
        let args = build_args(url, options);
        log::info!("Running {:?} {:?}", bin, args);

        let mut child = Command::new(&bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let out = child
            .stdout
            .take()
            .ok_or_else(|| FetchError::Other("yt-dlp stdout was not captured".into()))?;
        let err = child
            .stderr
            .take()
            .ok_or_else(|| FetchError::Other("yt-dlp stderr was not captured".into()))?;

        let tracking = TrackingHook {
            inner: hook,
            finished: AtomicBool::new(false),
        };
        let (out_res, err_res) =
            tokio::join!(forward_lines(out, &tracking), forward_lines(err, &tracking));

        // Reap the child before reporting a read failure.
        let status = child.wait().await?;
        out_res?;
        err_res?;

        if status.success() {
            Ok(())
        } else if status.code() == Some(1) && tracking.finished.load(Ordering::Relaxed) {
            log::warn!("yt-dlp for {} finished with some entries failing", url);
            Err(FetchError::Incomplete)
        } else {
            log::warn!("yt-dlp for {} exited with {}", url, status);
            Err(FetchError::Exit { code: status.code() })
        }
    }
}
