//! Application context shared by the binary's tasks.
//!
//! Built once at startup from the loaded settings.  Holds the only handle to
//! the settings saver, so every write to the settings file goes through here.
//!
//! # Running without a saver
//!
//! When the settings file exists but cannot be parsed, the binary keeps the
//! broken file untouched and runs on in-memory defaults.  The context is then
//! built with `saver: None` and [`AppContext::save_settings`] becomes a no-op,
//! so a later save cannot overwrite the user's file with defaults.
//!
//! # Saving
//!
//! A save snapshots the settings and releases the settings lock before the
//! file is written, so readers are never blocked on disk I/O.  The saver sits
//! behind its own lock: saves run one at a time and each one snapshots after
//! the previous write finished, so the file always ends up with the latest
//! settings.  The write itself is a small synchronous `fs::write`.

use std::sync::Arc;

use keyasio_core::{ConfigError, RealtimeState};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::infrastructure::storage::settings::{AppSettings, SettingsSaver};

/// Process-wide application state.
pub struct AppContext {
    /// The current settings.  Changes are persisted by [`Self::save_settings`].
    pub settings: Mutex<AppSettings>,
    saver: Option<Mutex<SettingsSaver>>,
    realtime: Arc<Mutex<RealtimeState>>,
}

impl AppContext {
    /// Creates the context around already-loaded settings.
    pub fn new(settings: AppSettings, saver: Option<SettingsSaver>) -> Arc<Self> {
        Arc::new(Self {
            settings: Mutex::new(settings),
            saver: saver.map(Mutex::new),
            realtime: Arc::new(Mutex::new(RealtimeState::new())),
        })
    }

    /// Shared handle to the live game state.
    pub fn realtime_state(&self) -> Arc<Mutex<RealtimeState>> {
        Arc::clone(&self.realtime)
    }

    /// Whether settings changes can be written back to disk.
    pub fn can_persist(&self) -> bool {
        self.saver.is_some()
    }

    /// Writes the current settings to the file they were loaded from.
    ///
    /// Returns `Ok(false)` when the context has no saver.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be written.
    pub async fn save_settings(&self) -> Result<bool, ConfigError> {
        let Some(saver) = &self.saver else {
            return Ok(false);
        };
        let saver = saver.lock().await;
        let snapshot = self.settings.lock().await.clone();
        saver.save(&snapshot)?;
        info!("settings saved to {}", saver.path().display());
        Ok(true)
    }

    /// Applies `update` to the settings and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be written; the in-memory
    /// change is kept either way.
    pub async fn update_settings<F>(&self, update: F) -> Result<bool, ConfigError>
    where
        F: FnOnce(&mut AppSettings),
    {
        update(&mut *self.settings.lock().await);
        self.save_settings().await
    }

    /// Flushes settings before the process exits.  Failures are logged.
    pub async fn shutdown(&self) {
        match self.save_settings().await {
            Ok(true) => {}
            Ok(false) => warn!("settings were not saved: running on in-memory defaults"),
            Err(e) => error!("failed to save settings on shutdown: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::settings::{load_settings, SettingsFormat};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_save_settings_without_saver_is_noop() {
        let ctx = AppContext::new(AppSettings::default(), None);

        let saved = ctx.save_settings().await.expect("no-op save");

        assert!(!saved);
        assert!(!ctx.can_persist());
    }

    #[tokio::test]
    async fn test_update_settings_persists_change() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("keyasio_ctx_{}", Uuid::new_v4()));
        let path = dir.join("appsettings.yaml");
        let loaded = load_settings(&path, SettingsFormat::Yaml).expect("load");
        let ctx = AppContext::new(loaded.settings, Some(loaded.saver));

        // Act
        let saved = ctx
            .update_settings(|s| s.debugging = true)
            .await
            .expect("update");

        // Assert
        assert!(saved);
        let reloaded = load_settings(&path, SettingsFormat::Yaml).expect("reload");
        assert!(reloaded.settings.debugging);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_leave_latest_settings_on_disk() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("keyasio_ctx_{}", Uuid::new_v4()));
        let path = dir.join("appsettings.yaml");
        let loaded = load_settings(&path, SettingsFormat::Yaml).expect("load");
        let ctx = AppContext::new(loaded.settings, Some(loaded.saver));

        // Act
        let tasks: Vec<_> = (0..16u32)
            .map(|i| {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    ctx.update_settings(|s| s.keys.push(format!("K{i}")))
                        .await
                        .expect("update")
                })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap());
        }

        // Assert
        let in_memory = ctx.settings.lock().await.clone();
        assert_eq!(in_memory.keys.len(), 2 + 16);
        let reloaded = load_settings(&path, SettingsFormat::Yaml).expect("reload");
        assert_eq!(reloaded.settings, in_memory);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_queued_save_picks_up_changes_made_while_waiting() {
        // Arrange: a write in progress holds the saver
        let dir = std::env::temp_dir().join(format!("keyasio_ctx_{}", Uuid::new_v4()));
        let path = dir.join("appsettings.yaml");
        let loaded = load_settings(&path, SettingsFormat::Yaml).expect("load");
        let ctx = AppContext::new(loaded.settings, Some(loaded.saver));
        let in_progress = ctx.saver.as_ref().unwrap().lock().await;
        let queued = tokio::spawn({
            let ctx = Arc::clone(&ctx);
            async move { ctx.save_settings().await }
        });
        tokio::task::yield_now().await;

        // Act: settings stay writable while the save waits
        ctx.settings.try_lock().expect("settings must not be held").volume = 25;
        drop(in_progress);
        let saved = queued.await.unwrap().expect("save");

        // Assert
        assert!(saved);
        let reloaded = load_settings(&path, SettingsFormat::Yaml).expect("reload");
        assert_eq!(reloaded.settings.volume, 25);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_realtime_state_handle_is_shared() {
        let ctx = AppContext::new(AppSettings::default(), None);

        ctx.realtime_state().lock().await.combo = 42;

        assert_eq!(ctx.realtime_state().lock().await.combo, 42);
    }
}
