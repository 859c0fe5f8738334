//! KeyAsio entry point.
//!
//! Wires together the infrastructure services and runs until Ctrl+C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ init_logging()          -- info, or RUST_LOG
//!  └─ InstanceGuard::acquire  -- exit if another instance runs
//!  └─ load_settings()         -- create/normalise appsettings.yaml
//!  └─ AppContext::new()       -- settings + saver + real-time state
//!  └─ start_realtime()        -- RealtimeSync (Tokio task)
//!  └─ ctrl_c → stop source → AppContext::shutdown() (saves settings)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use keyasio_app::infrastructure::context::AppContext;
use keyasio_app::infrastructure::instance_guard::InstanceGuard;
use keyasio_app::infrastructure::logging::init_logging;
use keyasio_app::infrastructure::realtime_listener::scripted::ScriptedRealtimeSource;
use keyasio_app::infrastructure::realtime_listener::{
    start_realtime, RealtimePump, RealtimeSource,
};
use keyasio_app::infrastructure::storage::settings::{
    load_settings, AppSettings, SettingsFormat,
};
use keyasio_core::RealtimeProperty;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// KeyAsio: low-latency hit sounds for osu!.
#[derive(Debug, Parser)]
#[command(name = "keyasio", version)]
struct Cli {
    /// Settings file.  Relative paths resolve against the working directory.
    #[arg(long, default_value = "appsettings.yaml", env = "KEYASIO_CONFIG")]
    config: PathBuf,

    /// Single-instance lock file.
    #[arg(long, default_value = "keyasio.lock", env = "KEYASIO_LOCK_FILE")]
    lock_file: PathBuf,

    /// Settings file format.  Inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    format: Option<SettingsFormat>,
}

impl Cli {
    fn settings_format(&self) -> SettingsFormat {
        self.format
            .unwrap_or_else(|| SettingsFormat::from_path(&self.config))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log = init_logging().context("failed to initialise logging")?;

    let Some(_guard) = InstanceGuard::acquire(&cli.lock_file)
        .with_context(|| format!("failed to lock {}", cli.lock_file.display()))?
    else {
        warn!("KeyAsio is already running; exiting");
        return Ok(());
    };

    // A broken settings file is left alone; run on defaults without saving.
    let (settings, saver) = match load_settings(&cli.config, cli.settings_format()) {
        Ok(loaded) => (loaded.settings, Some(loaded.saver)),
        Err(e) => {
            error!("{e}");
            warn!("running with default settings; changes will not be saved");
            (AppSettings::default(), None)
        }
    };

    if let Err(e) = log.set_debugging(settings.debugging) {
        warn!("failed to apply log level: {e}");
    }
    info!("application started");

    let ctx = AppContext::new(settings, saver);

    // ── Real-time pump ────────────────────────────────────────────────────────
    let source = ScriptedRealtimeSource::new();
    let pump = match start_realtime(&ctx, &source).await {
        Ok(pump) => pump,
        Err(e) => {
            error!("failed to start real-time listener: {e}");
            None
        }
    };

    let pump_handle = pump.map(|RealtimePump { handle, mut changes }| {
        let ctx_clone = Arc::clone(&ctx);
        tokio::spawn(async move {
            while let Some(property) = changes.recv().await {
                if property == RealtimeProperty::OsuStatus {
                    let status = ctx_clone.realtime_state().lock().await.osu_status;
                    info!("game status: {status:?}");
                }
            }
        });
        handle
    });

    // ── Shutdown ──────────────────────────────────────────────────────────────
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("received Ctrl+C; shutting down");

    source.stop();
    if let Some(handle) = pump_handle {
        if let Err(e) = handle.await {
            error!("real-time pump panicked: {e}");
        }
    }
    ctx.shutdown().await;

    info!("application stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
