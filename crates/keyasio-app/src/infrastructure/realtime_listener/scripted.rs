//! Scripted real-time source.
//!
//! Lets tests and the headless binary feed synthetic [`RealtimeEvent`]s to the
//! pump without a running game process.

use std::sync::{Mutex, MutexGuard, PoisonError};

use keyasio_core::RealtimeEvent;
use tokio::sync::mpsc::{self, UnboundedSender};

use super::{ListenerConfig, ListenerError, RealtimeSource};

/// A [`RealtimeSource`] whose events are pushed by the caller.
#[derive(Default)]
pub struct ScriptedRealtimeSource {
    sender: Mutex<Option<UnboundedSender<RealtimeEvent>>>,
    config: Mutex<Option<ListenerConfig>>,
}

impl ScriptedRealtimeSource {
    /// Creates a stopped source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects a synthetic event, as if observed in the game.
    ///
    /// Returns `false` when the source is not running or the pump has gone.
    pub fn inject_event(&self, event: RealtimeEvent) -> bool {
        match &*lock(&self.sender) {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    /// Whether `start()` has been called without a matching `stop()`.
    pub fn is_running(&self) -> bool {
        lock(&self.sender).is_some()
    }

    /// The configuration passed to the most recent `start()`.
    pub fn last_config(&self) -> Option<ListenerConfig> {
        lock(&self.config).clone()
    }
}

impl RealtimeSource for ScriptedRealtimeSource {
    fn start(
        &self,
        config: &ListenerConfig,
    ) -> Result<mpsc::UnboundedReceiver<RealtimeEvent>, ListenerError> {
        let mut sender = lock(&self.sender);
        if sender.is_some() {
            return Err(ListenerError::AlreadyStarted);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *sender = Some(tx);
        *lock(&self.config) = Some(config.clone());
        Ok(rx)
    }

    fn stop(&self) {
        // Dropping the sender closes the channel.
        lock(&self.sender).take();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
