//! Real-time listener infrastructure.
//!
//! The listener that reads the game's live state (player, mods, combo, score,
//! play time, beatmap, status) is an external component.  This module defines
//! the seam KeyAsio talks to it through, and the pump that connects it to the
//! [`RealtimeSync`] use case:
//!
//! ```text
//! RealtimeSource::start() ──UnboundedReceiver<RealtimeEvent>──► RealtimeSync::run (Tokio task)
//! ```
//!
//! # Testability
//!
//! The [`RealtimeSource`] trait allows tests and the headless binary to inject
//! synthetic events without a running game.  See [`scripted`].

use std::sync::Arc;
use std::time::Duration;

use keyasio_core::{RealtimeEvent, RealtimeProperty};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::application::realtime_sync::RealtimeSync;
use crate::infrastructure::context::AppContext;
use crate::infrastructure::storage::settings::RealtimeOptions;

pub mod scripted;

/// Error type for real-time listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// `start()` was called on a source that is already running.
    #[error("real-time listener is already running")]
    AlreadyStarted,

    /// The listener could not attach to its data source.
    #[error("real-time listener unavailable: {0}")]
    Unavailable(String),
}

/// Polling parameters handed to a [`RealtimeSource`] when it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Delay between two polls of the game process.
    pub listen_interval: Duration,
    /// Report every poll that fails to find the game process.
    pub report_process_not_found: bool,
}

impl From<&RealtimeOptions> for ListenerConfig {
    fn from(options: &RealtimeOptions) -> Self {
        Self {
            listen_interval: Duration::from_millis(options.listen_interval_ms),
            report_process_not_found: options.report_process_not_found,
        }
    }
}

/// Abstraction over a component that emits [`RealtimeEvent`]s.
///
/// Implementations must emit events in the order they observe the changes;
/// the pump applies them in exactly that order.
#[cfg_attr(test, mockall::automock)]
pub trait RealtimeSource: Send + Sync {
    /// Starts listening and returns the channel events will arrive on.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] if the source is already running or cannot
    /// attach to the game.
    fn start(
        &self,
        config: &ListenerConfig,
    ) -> Result<mpsc::UnboundedReceiver<RealtimeEvent>, ListenerError>;

    /// Stops listening.  Closes the event channel, which ends the pump.
    fn stop(&self);
}

/// A running real-time pump.
pub struct RealtimePump {
    /// Resolves to the number of processed events once the source stops.
    pub handle: JoinHandle<u64>,
    /// Property change notifications in emission order.
    pub changes: mpsc::UnboundedReceiver<RealtimeProperty>,
}

/// Starts `source` and spawns the task applying its events to `ctx`.
///
/// Returns `Ok(None)` without touching the source when real-time mode is
/// disabled in the settings.
///
/// # Errors
///
/// Returns [`ListenerError`] if the source fails to start.
pub async fn start_realtime(
    ctx: &Arc<AppContext>,
    source: &dyn RealtimeSource,
) -> Result<Option<RealtimePump>, ListenerError> {
    let options = ctx.settings.lock().await.realtime_options.clone();
    if !options.realtime_mode {
        info!("real-time mode disabled; listener not started");
        return Ok(None);
    }

    let config = ListenerConfig::from(&options);
    let events = source.start(&config)?;
    let mut sync = RealtimeSync::new(ctx.realtime_state());
    let changes = sync.subscribe();
    let handle = tokio::spawn(sync.run(events));

    info!(
        "real-time listener started (interval {} ms)",
        config.listen_interval.as_millis()
    );
    Ok(Some(RealtimePump { handle, changes }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::settings::AppSettings;
    use keyasio_core::OsuStatus;

    #[test]
    fn test_listener_config_from_default_options() {
        let config = ListenerConfig::from(&RealtimeOptions::default());
        assert_eq!(config.listen_interval, Duration::from_millis(3));
        assert!(!config.report_process_not_found);
    }

    #[tokio::test]
    async fn test_start_realtime_skips_source_when_mode_disabled() {
        // Arrange
        let mut settings = AppSettings::default();
        settings.realtime_options.realtime_mode = false;
        let ctx = AppContext::new(settings, None);
        let mut source = MockRealtimeSource::new();
        source.expect_start().never();

        // Act
        let pump = start_realtime(&ctx, &source).await.expect("start");

        // Assert
        assert!(pump.is_none());
    }

    #[tokio::test]
    async fn test_start_realtime_passes_configured_interval() {
        // Arrange
        let mut settings = AppSettings::default();
        settings.realtime_options.listen_interval_ms = 50;
        let ctx = AppContext::new(settings, None);
        let mut source = MockRealtimeSource::new();
        source
            .expect_start()
            .withf(|config| config.listen_interval == Duration::from_millis(50))
            .times(1)
            .returning(|_| {
                let (tx, rx) = mpsc::unbounded_channel();
                tx.send(RealtimeEvent::StatusChanged {
                    previous: OsuStatus::NoFoundProcess,
                    current: OsuStatus::SelectSong,
                })
                .unwrap();
                Ok(rx)
            });

        // Act
        let mut pump = start_realtime(&ctx, &source)
            .await
            .expect("start")
            .expect("pump must run in real-time mode");

        // Assert
        assert_eq!(pump.changes.recv().await, Some(RealtimeProperty::OsuStatus));
        assert_eq!(pump.handle.await.unwrap(), 1);
        assert_eq!(ctx.realtime_state().lock().await.osu_status, OsuStatus::SelectSong);
    }

    #[tokio::test]
    async fn test_start_realtime_propagates_source_error() {
        let ctx = AppContext::new(AppSettings::default(), None);
        let mut source = MockRealtimeSource::new();
        source
            .expect_start()
            .returning(|_| Err(ListenerError::Unavailable("no game process".to_string())));

        let result = start_realtime(&ctx, &source).await;

        assert!(matches!(result, Err(ListenerError::Unavailable(_))));
    }
}
