//! Real-time game state for KeyAsio.
//!
//! This module contains pure domain types with no infrastructure dependencies.
//! A listener running somewhere else (reading the game process) produces
//! [`RealtimeEvent`]s; the application applies them, in the order they were
//! emitted, to a single [`RealtimeState`].
//!
//! ```text
//! listener ──RealtimeEvent──► RealtimeState::apply ──RealtimeProperty──► subscribers
//! ```
//!
//! `apply` reports which property changed, or `None` when the event carried
//! the value the state already had.  Subscribers (audio cue scheduling, UI)
//! only hear about real changes.

pub mod mods;
pub mod state;

pub use mods::PlayMods;
pub use state::{Beatmap, OsuStatus, RealtimeEvent, RealtimeProperty, RealtimeState};
