//! Progress events and parsing of yt-dlp's line output.

/// Marker at the start of every line produced by [`PROGRESS_TEMPLATE`].
pub const PROGRESS_PREFIX: &str = "[vod-progress]";

/// `--progress-template` value: one `|`-separated line per progress update.
pub const PROGRESS_TEMPLATE: &str = "download:[vod-progress]%(progress.status)s|%(progress.filename)s|%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s";

/// Status event delivered by a fetcher while an item downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Downloading {
        filename: String,
        percent: Option<String>,
        speed: Option<String>,
        eta: Option<String>,
    },
    Finished {
        filename: String,
    },
    Error {
        message: Option<String>,
    },
}

impl ProgressEvent {
    /// Log line for `downloading` and `error` events. `finished` depends on
    /// the merge mode and is formatted by the worker.
    pub fn describe(&self) -> Option<String> {
        match self {
            ProgressEvent::Downloading {
                filename,
                percent,
                speed,
                eta,
            } => Some(format!(
                " > Downloading: {} | {} at {}, ETA: {}",
                filename,
                or_na(percent),
                or_na(speed),
                or_na(eta)
            )),
            ProgressEvent::Error { message } => Some(format!(
                " > ERROR: {}",
                message.as_deref().unwrap_or("Unknown yt-dlp error")
            )),
            ProgressEvent::Finished { .. } => None,
        }
    }
}

fn or_na(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("N/A")
}

/// One line of yt-dlp output, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Progress(ProgressEvent),
    Message(String),
    Ignored,
}

/// Classifies a line printed by yt-dlp on stdout or stderr.
pub fn parse_output_line(line: &str) -> ToolOutput {
    let line = line.trim_end();
    if let Some(event) = parse_progress_from_line(line) {
        return ToolOutput::Progress(event);
    }
    if line.is_empty() || line.starts_with("[debug] ") {
        ToolOutput::Ignored
    } else if let Some(rest) = line.strip_prefix("WARNING:") {
        ToolOutput::Message(format!("[WARNING] {}", rest.trim_start()))
    } else if let Some(rest) = line.strip_prefix("ERROR:") {
        ToolOutput::Message(format!("[ERROR] {}", rest.trim_start()))
    } else {
        ToolOutput::Message(line.to_owned())
    }
}

/// Parses a line produced by [`PROGRESS_TEMPLATE`].
pub fn parse_progress_from_line(line: &str) -> Option<ProgressEvent> {
    let rest = line.strip_prefix(PROGRESS_PREFIX)?;
    let (status, rest) = rest.split_once('|')?;
    // The filename may itself contain '|', so peel the fixed fields off the end.
    let mut tail = rest.rsplitn(4, '|');
    let eta = tail.next()?;
    let speed = tail.next()?;
    let percent = tail.next()?;
    let filename = tail.next()?.to_owned();

    match status.trim() {
        "downloading" => Some(ProgressEvent::Downloading {
            filename,
            percent: field(percent),
            speed: field(speed),
            eta: field(eta),
        }),
        "finished" => Some(ProgressEvent::Finished { filename }),
        // yt-dlp never renders the template for failures; those arrive as `ERROR:` lines.
        _ => None,
    }
}

fn field(raw: &str) -> Option<String> {
    let value = raw.trim();
    match value {
        "" | "NA" | "N/A" | "Unknown" => None,
        _ => Some(value.to_owned()),
    }
}
