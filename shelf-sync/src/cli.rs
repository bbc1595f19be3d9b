///
/// This module implements the CLI interface for shelf-sync: command parsing,
/// wiring config, logging, the HTTP client and the watcher together.
///
/// All pipeline logic (reading, transforming, uploading, archiving) lives in the
/// [`shelf-sync-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - From the shell: `shelf-sync watch --config sync.yaml` (runs until Ctrl-C) or
///   `shelf-sync once --config sync.yaml` (single cycle, non-zero exit if a file failed).
/// - Programmatically / from integration tests: call [`run`] with a constructed [`Cli`].
///
/// [`shelf-sync-core`]: ../../shelf-sync-core/
use crate::client::EslClient;
use crate::load_config::load_config;
use crate::logging;
use anyhow::Result;
use clap::{Parser, Subcommand};
use shelf_sync_core::watcher::{FileOutcome, Watcher};
use std::path::PathBuf;

/// CLI for shelf-sync: push dropped price spreadsheets to the shelf label service.
#[derive(Parser)]
#[clap(
    name = "shelf-sync",
    version,
    about = "Poll a folder for price spreadsheets and sync them to an electronic shelf label service"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the watch folder forever (until Ctrl-C)
    Watch {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Run a single polling cycle and exit
    Once {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let (config_path, single_cycle) = match cli.command {
        Commands::Watch { config } => (config, false),
        Commands::Once { config } => (config, true),
    };

    let config = tracing::subscriber::with_default(logging::bootstrap_subscriber(), || {
        load_config(&config_path)
    })?;
    let _log_guard = logging::init(&config.logging)?;

    let client = EslClient::new(&config.api, config.credentials.clone())
        .map_err(|e| anyhow::anyhow!("Failed to construct price-sync client: {e}"))?;
    let watcher = Watcher::new(config.sync, client);
    watcher.prepare();

    if single_cycle {
        tracing::info!(command = "once", "Running a single sync cycle");
        let report = watcher.run_cycle().await;
        for file in &report.files {
            match &file.outcome {
                FileOutcome::Archived { records, batches, .. } => {
                    tracing::info!(file = %file.path.display(), records, batches, "File synced")
                }
                FileOutcome::Failed { stage, error } => {
                    tracing::error!(file = %file.path.display(), ?stage, error = %error, "File not synced")
                }
            }
        }
        let failed = report.failed();
        if failed > 0 {
            anyhow::bail!("{failed} of {} file(s) failed to sync", report.files.len());
        }
        return Ok(());
    }

    tracing::info!(command = "watch", "Starting watch loop");
    // Ctrl-C is registered before the first cycle and honoured between cycles.
    let stop = tokio::spawn(shutdown_signal());
    let cycles = watcher
        .run_until(async {
            let _ = stop.await;
        })
        .await;
    tracing::info!(cycles, "Watch loop stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}
