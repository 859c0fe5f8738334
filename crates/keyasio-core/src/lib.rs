//! # keyasio-core
//!
//! Shared library for KeyAsio containing the configuration loader and the
//! real-time game state model.
//!
//! This crate is used by the application shell (`keyasio-app`).  It has no
//! dependencies on UI frameworks, audio devices, or the game process; the only
//! OS facility it touches is the file system, and only inside the loader.
//!
//! # Architecture overview (for beginners)
//!
//! KeyAsio plays hit sounds and other audio cues in sync with what is
//! happening inside a running rhythm game: the current combo, score, beatmap
//! and play position.  Everything the player can tune lives in a small YAML
//! settings file next to the executable.
//!
//! This crate (`keyasio-core`) is the shared foundation.  It defines:
//!
//! - **`config`** – How settings travel between disk and memory.  A schema
//!   type is loaded from a file, defaults are written out on first run, and a
//!   [`Saver`] bound to that file lets the owner persist later changes.
//!
//! - **`realtime`** – Pure domain types describing the game's live state
//!   (status, mods, combo, score, beatmap) and the change events a listener
//!   emits while the game runs.

pub mod config;
pub mod realtime;

// Re-export the most-used types at the crate root so callers can write
// `keyasio_core::ConfigLoader` instead of `keyasio_core::config::loader::ConfigLoader`.
pub use config::codec::{CodecError, ConfigCodec, TomlCodec, YamlCodec};
pub use config::encoding::{EncodingError, TextEncoding};
pub use config::loader::{
    load_config, ConfigError, ConfigLoader, Configuration, LoadOrigin, Loaded, ResavePolicy,
    Saver,
};
pub use realtime::{
    Beatmap, OsuStatus, PlayMods, RealtimeEvent, RealtimeProperty, RealtimeState,
};
