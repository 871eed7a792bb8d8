use std::path::{Path, PathBuf};

/// File naming template handed to yt-dlp, relative to the download directory.
pub const OUTPUT_TEMPLATE: &str = "%(title)s - [%(id)s].%(ext)s";

/// User-configurable options, read once per queue item at dispatch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// cookies.txt used to authenticate with the site
    pub cookie_file: Option<PathBuf>,
    /// Folder the downloaded files are written to
    pub download_dir: PathBuf,
    /// Mux video and audio into one file instead of keeping both streams
    pub merge_enabled: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            cookie_file: None,
            download_dir: default_download_dir(),
            merge_enabled: false,
        }
    }
}

impl Options {
    pub fn merge_mode(&self) -> MergeMode {
        if self.merge_enabled {
            MergeMode::Merge
        } else {
            MergeMode::Split
        }
    }
}

/// The user's download folder, falling back to `~/Downloads` and then `./downloads`.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("./downloads"))
}

/// How video and audio streams end up on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Best video and best audio muxed into a single file
    Merge,
    /// Best video-only and best audio-only kept as two files
    Split,
}

impl MergeMode {
    pub fn format(self) -> FormatSelection {
        match self {
            MergeMode::Merge => FormatSelection::BestCombined,
            MergeMode::Split => FormatSelection::SeparateStreams,
        }
    }

    /// Line announced at the start of each item.
    pub fn announcement(self) -> &'static str {
        match self {
            MergeMode::Merge => "[OPTIONS] Merge Mode enabled. Creating single output file.",
            MergeMode::Split => {
                "[OPTIONS] Split Mode enabled. Saving separate video and audio files."
            }
        }
    }

    /// Line logged when the fetcher reports a finished stream.
    pub fn finished_message(self) -> &'static str {
        match self {
            MergeMode::Merge => " > Download finished. Now merging formats if needed...",
            MergeMode::Split => " > Download of stream complete.",
        }
    }
}

/// yt-dlp format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSelection {
    /// Best video + best audio merged, or the best single stream if there are no separate ones
    BestCombined,
    /// Best video-only and best audio-only, downloaded as separate files
    SeparateStreams,
}

impl FormatSelection {
    pub fn selector(self) -> &'static str {
        match self {
            FormatSelection::BestCombined => "bv*+ba/b",
            FormatSelection::SeparateStreams => "bv*,ba",
        }
    }
}

/// Options for a single fetch, derived from an [`Options`] snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Full output path template (`<dir>/<title> - [<id>].<ext>`)
    pub output_template: String,
    /// Credential file passed through to the fetcher
    pub cookie_file: Option<PathBuf>,
    /// Keep going when one entry of a playlist fails
    pub ignore_errors: bool,
    /// Expand playlist URLs into their entries
    pub expand_playlists: bool,
    /// Which streams to fetch
    pub format: FormatSelection,
    /// Keep the separate streams on disk instead of deleting them after muxing
    pub keep_intermediates: bool,
}

impl FetchOptions {
    pub fn from_options(options: &Options) -> Self {
        let mode = options.merge_mode();
        Self {
            output_template: output_template(&options.download_dir),
            cookie_file: options.cookie_file.clone(),
            ignore_errors: true,
            expand_playlists: true,
            format: mode.format(),
            keep_intermediates: mode == MergeMode::Split,
        }
    }
}

fn output_template(dir: &Path) -> String {
    dir.join(OUTPUT_TEMPLATE).to_string_lossy().into_owned()
}

/// Single-flight guard for worker runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    /// A worker run is active
    pub is_running: bool,
}
