//! Configuration loading and persistence.
//!
//! The loader turns a file path and a schema type into a populated settings
//! value, creating a default file on first run.  It is split into three
//! pieces so each can be tested on its own:
//!
//! - **`codec`**    – The text format boundary (YAML by default, TOML on
//!   request).  Exactly two operations: serialize and deserialize.
//! - **`encoding`** – Bytes ↔ text, including byte-order-mark detection so
//!   files saved by other editors still load.
//! - **`loader`**   – The load/default/save protocol itself and the [`Saver`]
//!   handed back to the owner of the settings.
//!
//! # Schema requirements
//!
//! A schema type must implement [`Configuration`] and should carry
//! `#[serde(default)]`: the loader obtains default values by deserializing a
//! placeholder document that names none of the schema's fields.

pub mod codec;
pub mod encoding;
pub mod loader;

pub use codec::{CodecError, ConfigCodec, TomlCodec, YamlCodec};
pub use encoding::{EncodingError, TextEncoding};
pub use loader::{
    load_config, ConfigError, ConfigLoader, Configuration, LoadOrigin, Loaded, ResavePolicy,
    Saver,
};
