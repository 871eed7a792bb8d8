//! Persisted user settings (`settings.ron` in the platform config dir).

use std::{
    fs,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};
use crate::{
    error::ConfigError,
    model::{Options, default_download_dir},
};

const APP_DIR: &str = "vod_downloader";
const SETTINGS_FILENAME: &str = "settings.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub download_dir: PathBuf,
    pub cookie_file: Option<PathBuf>,
    pub merge_enabled: bool,
    /// Explicit yt-dlp executable, overriding the bundled copy and `PATH`
    pub ytdlp_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            cookie_file: None,
            merge_enabled: false,
            ytdlp_path: None,
        }
    }
}

impl Settings {
    pub fn options(&self) -> Options {
        Options {
            cookie_file: self.cookie_file.clone(),
            download_dir: self.download_dir.clone(),
            merge_enabled: self.merge_enabled,
        }
    }

    /// Copies the user-editable options back, keeping the rest.
    pub fn update_from(&mut self, options: &Options) {
        self.cookie_file = options.cookie_file.clone();
        self.download_dir = options.download_dir.clone();
        self.merge_enabled = options.merge_enabled;
    }
}

/// Default location of the settings file.
pub fn settings_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILENAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Reads settings from `path`. A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let content = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::new())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the user's settings, falling back to defaults on any problem.
pub fn load() -> Settings {
    let loaded = settings_path().and_then(|path| load_from(&path));
    match loaded {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("Using default settings: {}", err);
            Settings::default()
        }
    }
}

/// Saves the user's settings, logging instead of failing.
pub fn save(settings: &Settings) {
    if let Err(err) = settings_path().and_then(|path| save_to(&path, settings)) {
        log::error!("Failed to save settings: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_from(&dir.path().join("nope.ron")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILENAME);
        let settings = Settings {
            download_dir: PathBuf::from("/media/vods"),
            cookie_file: Some(PathBuf::from("/home/u/cookies.txt")),
            merge_enabled: true,
            ytdlp_path: None,
        };
        save_to(&path, &settings).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "(merge_enabled: true)").unwrap();
        let settings = load_from(&path).unwrap();
        assert!(settings.merge_enabled);
        assert_eq!(settings.cookie_file, None);
        assert_eq!(settings.download_dir, default_download_dir());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "not ron at all {").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn options_round_trip_through_settings() {
        let mut settings = Settings::default();
        let mut options = settings.options();
        options.merge_enabled = true;
        options.cookie_file = Some(PathBuf::from("c.txt"));
        settings.update_from(&options);
        assert_eq!(settings.options(), options);
    }
}
