//! egui front-end: queue editing, options and the log panel.

use eframe::{App, Frame, egui};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use vod_downloader::{
    Session, StartError,
    config::{self, Settings},
};

const URL_HINT: &str = "Paste one or more YouTube URLs or playlist URLs here...";

/// Application state for the GUI
pub struct DownloaderApp {
    /// Multi-line URL input
    url_input: String,
    /// Queue row the Up/Down/Remove buttons act on
    selected: Option<usize>,
    /// Everything drained from the session log so far
    log_lines: Vec<String>,
    session: Session,
    /// Persisted copy of the options
    settings: Settings,
}

impl DownloaderApp {
    pub fn new(session: Session, settings: Settings) -> Self {
        Self {
            url_input: String::new(),
            selected: None,
            log_lines: Vec::new(),
            session,
            settings,
        }
    }

    fn persist_options(&mut self) {
        self.settings.update_from(self.session.options());
        config::save(&self.settings);
    }

    fn add_to_queue(&mut self) {
        let added = self.session.queue_mut().add(&self.url_input);
        log::debug!("Queued {} URL(s)", added);
        self.url_input.clear();
    }

    fn start_download(&mut self) {
        if let Err(err) = self.session.start() {
            show_start_refusal(&err);
        }
    }

    fn input_panel(&mut self, ui: &mut egui::Ui, idle: bool) {
        ui.heading("1. Add Videos");
        ui.add(
            egui::TextEdit::multiline(&mut self.url_input)
                .hint_text(URL_HINT)
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );
        if ui.add_enabled(idle, egui::Button::new("Add to Queue")).clicked() {
            self.add_to_queue();
        }
    }

    fn queue_panel(&mut self, ui: &mut egui::Ui, idle: bool) {
        ui.heading("2. Download Queue");
        let current = self.session.current_index();
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_min_width(ui.available_width() - 90.0);
                egui::ScrollArea::vertical()
                    .id_source("queue")
                    .max_height(180.0)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        for (index, url) in self.session.queue().items().iter().enumerate() {
                            let text = if current == Some(index) {
                                format!("⬇ {url}")
                            } else {
                                url.clone()
                            };
                            let picked = self.selected == Some(index) || current == Some(index);
                            if ui.selectable_label(picked, text).clicked() && idle {
                                self.selected = Some(index);
                            }
                        }
                    });
            });

            ui.vertical(|ui| {
                let has_selection = idle && self.selected.is_some();
                if ui.add_enabled(has_selection, egui::Button::new("Up")).clicked() {
                    if let Some(index) = self.selected {
                        if let Some(moved) = self.session.queue_mut().move_up(index) {
                            self.selected = Some(moved);
                        }
                    }
                }
                if ui.add_enabled(has_selection, egui::Button::new("Down")).clicked() {
                    if let Some(index) = self.selected {
                        if let Some(moved) = self.session.queue_mut().move_down(index) {
                            self.selected = Some(moved);
                        }
                    }
                }
                if ui.add_enabled(has_selection, egui::Button::new("Remove")).clicked() {
                    if let Some(index) = self.selected.take() {
                        self.session.queue_mut().remove(index);
                    }
                }
                ui.add_space(20.0);
                if ui.add_enabled(idle, egui::Button::new("Clear")).clicked() {
                    self.session.queue_mut().clear();
                    self.selected = None;
                }
            });
        });
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui, idle: bool) {
        ui.heading("3. Settings & Download");

        ui.horizontal(|ui| {
            if ui.add_enabled(idle, egui::Button::new("Select cookies.txt")).clicked() {
                if let Some(path) = FileDialog::new()
                    .set_title("Select your cookies.txt file")
                    .add_filter("Text files", &["txt"])
                    .pick_file()
                {
                    self.session.set_cookie_file(path);
                    self.persist_options();
                }
            }
            match self.session.options().cookie_file.as_ref() {
                Some(path) => ui.label(format!(
                    "Using: ...{}",
                    path.file_name().unwrap_or_default().to_string_lossy()
                )),
                None => ui.label("No cookie file selected."),
            };
        });

        ui.horizontal(|ui| {
            if ui.add_enabled(idle, egui::Button::new("Select Download Folder")).clicked() {
                if let Some(folder) = FileDialog::new()
                    .set_title("Select where to save videos")
                    .set_directory(&self.session.options().download_dir)
                    .pick_folder()
                {
                    self.session.set_download_dir(folder);
                    self.persist_options();
                }
            }
            ui.label(format!(
                "Saving to: {}",
                self.session.options().download_dir.display()
            ));
        });

        let mut merge = self.session.options().merge_enabled;
        let toggle = ui.add_enabled(
            idle,
            egui::Checkbox::new(&mut merge, "Merge video and audio into a single file"),
        );
        if toggle.changed() {
            self.session.set_merge_enabled(merge);
            self.persist_options();
        }

        ui.add_space(10.0);
        let label = if idle { "Start Download" } else { "Downloading..." };
        let start = egui::Button::new(egui::RichText::new(label).strong())
            .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add_enabled(idle, start).clicked() {
            self.start_download();
        }
    }

    fn log_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Log Output");
        egui::ScrollArea::vertical()
            .id_source("log")
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for line in &self.log_lines {
                    ui.label(egui::RichText::new(line).monospace());
                }
            });
    }
}

fn show_start_refusal(err: &StartError) {
    let (level, title) = match err {
        StartError::Busy => (MessageLevel::Warning, "Busy"),
        StartError::MissingCookieFile => (MessageLevel::Error, "Error"),
        StartError::EmptyQueue => (MessageLevel::Info, "Info"),
    };
    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(&err.to_string())
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for DownloaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Drain the worker log and pick up the end of a run
        let update = self.session.poll();
        self.log_lines.extend(update.lines);
        if update.finished.is_some() {
            self.selected = None;
            let _ = MessageDialog::new()
                .set_level(MessageLevel::Info)
                .set_title("Success")
                .set_description("All items in the queue have been processed.")
                .set_buttons(MessageButtons::Ok)
                .show();
        }

        let idle = !self.session.is_running();

        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .min_height(200.0)
            .show(ctx, |ui| self.log_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.input_panel(ui, idle);
            ui.separator();
            self.queue_panel(ui, idle);
            ui.separator();
            self.settings_panel(ui, idle);
        });

        // Poll the log every 100ms even when the window is idle
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
