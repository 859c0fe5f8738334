//! Application settings schema and persistence.
//!
//! Settings live in `appsettings.yaml` next to wherever KeyAsio is started
//! from (relative paths resolve against the working directory).  Example:
//!
//! ```yaml
//! debugging: false
//! keys:
//! - Z
//! - X
//! volume: 100
//! realtime_options:
//!   realtime_mode: true
//!   listen_interval_ms: 3
//!   report_process_not_found: false
//! ```
//!
//! # Serde default values
//!
//! Every struct here carries `#[serde(default)]`, so any field missing from
//! the file takes its value from the `Default` impl.  This is what lets the
//! loader build a complete default config from a placeholder document on
//! first run, and what fills in new fields when an older file is loaded.

use std::path::{Path, PathBuf};

use keyasio_core::{
    ConfigError, ConfigLoader, Configuration, LoadOrigin, Saver, TomlCodec, YamlCodec,
};
use serde::{Deserialize, Serialize};

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level application settings stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Verbose logging and diagnostics.
    pub debugging: bool,
    /// Keys that trigger hit sounds, in the order the game binds them.
    pub keys: Vec<String>,
    /// Master volume in percent (0–100).
    pub volume: u32,
    /// Game installation folder; discovered at runtime when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osu_folder: Option<PathBuf>,
    /// Real-time listener settings.
    pub realtime_options: RealtimeOptions,
}

/// Settings for the real-time game listener.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RealtimeOptions {
    /// Follow the game's live state and play cues in sync with it.
    pub realtime_mode: bool,
    /// How often the listener polls the game process, in milliseconds.
    pub listen_interval_ms: u64,
    /// Log every poll that fails to find the game process.
    pub report_process_not_found: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debugging: false,
            keys: vec!["Z".to_string(), "X".to_string()],
            volume: 100,
            osu_folder: None,
            realtime_options: RealtimeOptions::default(),
        }
    }
}

impl Default for RealtimeOptions {
    fn default() -> Self {
        Self {
            realtime_mode: true,
            listen_interval_ms: 3,
            report_process_not_found: false,
        }
    }
}

impl Configuration for AppSettings {}

// ── Format selection ──────────────────────────────────────────────────────────

/// On-disk text format of the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SettingsFormat {
    #[default]
    Yaml,
    Toml,
}

impl SettingsFormat {
    /// Picks the format from the file extension; anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SettingsFormat::Toml,
            _ => SettingsFormat::Yaml,
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Saver for [`AppSettings`] in whichever format it was loaded with.
#[derive(Debug, Clone)]
pub enum SettingsSaver {
    Yaml(Saver<YamlCodec>),
    Toml(Saver<TomlCodec>),
}

impl SettingsSaver {
    /// Overwrites the settings file with `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Serialize`] on failure.
    pub fn save(&self, settings: &AppSettings) -> Result<(), ConfigError> {
        match self {
            SettingsSaver::Yaml(saver) => saver.save(settings),
            SettingsSaver::Toml(saver) => saver.save(settings),
        }
    }

    /// Absolute path of the settings file.
    pub fn path(&self) -> &Path {
        match self {
            SettingsSaver::Yaml(saver) => saver.path(),
            SettingsSaver::Toml(saver) => saver.path(),
        }
    }
}

/// Settings loaded from disk together with their saver.
#[derive(Debug)]
pub struct LoadedSettings {
    pub settings: AppSettings,
    pub saver: SettingsSaver,
    pub origin: LoadOrigin,
}

/// Loads [`AppSettings`] from `path`, creating a default file if none exists.
///
/// # Errors
///
/// Returns [`ConfigError`] when the existing file is malformed or the file
/// system refuses access; see [`ConfigLoader::load`].
pub fn load_settings(path: &Path, format: SettingsFormat) -> Result<LoadedSettings, ConfigError> {
    match format {
        SettingsFormat::Yaml => {
            let loaded = ConfigLoader::new().load::<AppSettings>(path)?;
            Ok(LoadedSettings {
                settings: loaded.config,
                saver: SettingsSaver::Yaml(loaded.saver),
                origin: loaded.origin,
            })
        }
        SettingsFormat::Toml => {
            let loaded = ConfigLoader::with_codec(TomlCodec).load::<AppSettings>(path)?;
            Ok(LoadedSettings {
                settings: loaded.config,
                saver: SettingsSaver::Toml(loaded.saver),
                origin: loaded.origin,
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
