//! RealtimeSyncUseCase: applies listener notifications to the shared state.
//!
//! The real-time listener emits one [`RealtimeEvent`] per observed change on a
//! single channel.  This use case is the only writer of the shared
//! [`RealtimeState`]:
//!
//! ```text
//! RealtimeSource ──mpsc──► RealtimeSync::run ──► RealtimeState (Mutex)
//!                                   │
//!                                   └──► subscribers (RealtimeProperty)
//! ```
//!
//! # Ordering guarantees
//!
//! Events are applied strictly in the order they are received, one at a
//! time, with no coalescing: five `ComboChanged` events produce five state
//! updates.  Subscribers receive property notifications in the same order.
//! Which thread runs the loop is up to the caller; the binary spawns it as a
//! Tokio task.

use std::sync::Arc;

use keyasio_core::{RealtimeEvent, RealtimeProperty, RealtimeState};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

/// Applies [`RealtimeEvent`]s to a shared [`RealtimeState`].
pub struct RealtimeSync {
    state: Arc<Mutex<RealtimeState>>,
    subscribers: Vec<mpsc::UnboundedSender<RealtimeProperty>>,
}

impl RealtimeSync {
    /// Creates a use case writing into `state`.
    pub fn new(state: Arc<Mutex<RealtimeState>>) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
        }
    }

    /// Registers a subscriber for property change notifications.
    ///
    /// Dropped receivers are pruned on the next notification.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RealtimeProperty> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Applies a single event and notifies subscribers if a property changed.
    pub async fn handle_event(&mut self, event: RealtimeEvent) -> Option<RealtimeProperty> {
        let changed = {
            let mut state = self.state.lock().await;
            let previous_combo = state.combo;
            let is_combo_event = matches!(event, RealtimeEvent::ComboChanged(_));
            let changed = state.apply(event);
            if is_combo_event && state.is_combo_break(previous_combo) {
                debug!("combo break at {previous_combo}x");
            }
            changed
        };

        if let Some(property) = changed {
            debug!("realtime property changed: {property}");
            self.subscribers.retain(|tx| tx.send(property).is_ok());
        }
        changed
    }

    /// Drains `events` until the sender side closes.
    ///
    /// Returns the number of events processed.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<RealtimeEvent>) -> u64 {
        let mut processed = 0u64;
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
            processed += 1;
        }
        info!("realtime event stream closed after {processed} events");
        processed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
