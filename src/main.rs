//! Streamer's VOD Downloader: desktop front-end for queueing yt-dlp downloads

// egui window and widgets
mod app;
use app::DownloaderApp;

// eframe/egui for GUI application framework
use eframe::egui::{self, Visuals};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::runtime::Runtime;
use vod_downloader::{Session, YtDlp, config, logging};

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Program entry point: initializes logging, runtime and settings, then launches the GUI
fn main() -> Result<(), eframe::Error> {
    logging::initialize();

    let rt = match Runtime::new() {
        Ok(rt) => Arc::new(rt),
        Err(err) => {
            log::error!("Failed to start the async runtime: {}", err);
            std::process::exit(1);
        }
    };
    let handle = rt.handle().clone();
    let _ = RUNTIME.set(rt);

    let settings = config::load();
    let fetcher = Arc::new(YtDlp::new(settings.ytdlp_path.clone()));
    let session = Session::new(settings.options(), fetcher, handle);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Streamer's VOD Downloader",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(DownloaderApp::new(session, settings))
        }),
    )
}
