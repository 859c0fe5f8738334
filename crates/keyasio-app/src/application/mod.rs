//! Application layer use cases for KeyAsio.
//!
//! Use cases in this layer orchestrate domain objects from `keyasio_core`
//! and contain no OS calls, no file system access, and no knowledge of where
//! their input comes from.
//!
//! # Sub-modules
//!
//! - **`realtime_sync`** – Consumes the listener's change notifications and
//!   applies them, one at a time and in emission order, to the shared
//!   [`keyasio_core::RealtimeState`].  Every real change is forwarded to
//!   subscribers as a [`keyasio_core::RealtimeProperty`].

pub mod realtime_sync;
