//! Storage infrastructure: settings file persistence.
//!
//! The `settings` sub-module defines the [`settings::AppSettings`] schema and
//! loads it through the `keyasio_core` configuration loader:
//!
//! - Reading the settings file (YAML by default, TOML when asked for).
//! - Writing defaults on first run and normalising existing files.
//! - Handing back a saver so later changes can be written to the same file.

pub mod settings;
