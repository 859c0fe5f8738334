//! Infrastructure layer for the KeyAsio application.
//!
//! Contains OS-facing adapters: settings file storage, the single-instance
//! lock, logging bootstrap, the real-time listener seam, and the application
//! context that ties them together for the binary.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `keyasio_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod context;
pub mod instance_guard;
pub mod logging;
pub mod realtime_listener;
pub mod storage;
