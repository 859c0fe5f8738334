//! Logging bootstrap.
//!
//! Logging has to start before the settings are loaded (so load errors are
//! visible), but the `debugging` setting decides the final level.  The
//! filter is therefore installed behind a reload layer and switched once the
//! settings are known.
//!
//! `RUST_LOG`, when set, always wins over the settings file.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, util::TryInitError, EnvFilter,
    Registry,
};

/// Handle for changing the log level after [`init_logging`].
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    env_override: bool,
}

/// Installs the global subscriber at `info` (or whatever `RUST_LOG` says).
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init_logging() -> Result<LogHandle, TryInitError> {
    let (filter, env_override) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(level_directive(false)), false),
    };
    let (filter_layer, filter) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer())
        .try_init()?;

    Ok(LogHandle {
        filter,
        env_override,
    })
}

impl LogHandle {
    /// Switches between `debug` and `info` unless `RUST_LOG` is in charge.
    ///
    /// # Errors
    ///
    /// Returns [`reload::Error`] if the subscriber has been dropped.
    pub fn set_debugging(&self, debugging: bool) -> Result<(), reload::Error> {
        if self.env_override {
            return Ok(());
        }
        self.filter
            .reload(EnvFilter::new(level_directive(debugging)))
    }
}

fn level_directive(debugging: bool) -> &'static str {
    if debugging {
        "debug"
    } else {
        "info"
    }
}
