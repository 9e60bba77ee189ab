#![doc = "report-relay: extract marker-delimited reports from a watch directory and relay them to the collector."]

//! Two independent, perpetually-running loops coordinate only through the
//! filesystem: the extraction loop turns dropped files into staged report
//! parts, the delivery loop hands staged parts to the collector and removes
//! them on acknowledgement. See the module docs for the individual pieces.

pub mod archive;
pub mod config;
pub mod delivery;
pub mod extract;
pub mod extraction;
pub mod load_config;
pub mod queue;
pub mod resolve;
pub mod split;
pub mod transport;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{Config, TransportSelection};
use crate::extraction::ExtractionSettings;
use crate::resolve::AddressResolver;

#[derive(Parser)]
#[clap(
    name = "report-relay",
    version,
    about = "Watch a spool directory for printed reports and relay extracted sections to the collector"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the extraction and delivery loops with the given config file
    Run {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { config } => {
            let config = load_config::load_config(config)?;
            config.trace_loaded();
            serve(config).await
        }
    }
}

/// Brings up both loops and runs them for the lifetime of the process.
async fn serve(config: Config) -> Result<()> {
    ensure_dirs(&config)?;

    let queue = Arc::new(queue::FsQueueStore::new(config.queue_dir.clone()));
    let resolver = resolve::HttpAddressResolver::new(
        config.discovery_url.clone(),
        config.default_addr.clone(),
    );
    let transport: Box<dyn transport::Transport> = match config.transport {
        TransportSelection::Http => {
            Box::new(transport::HttpTransport::new(config.account_id.clone()))
        }
        TransportSelection::Stream { port } => Box::new(transport::StreamTransport::new(
            config.account_id.clone(),
            port,
        )),
    };

    // Probe resolution once up front so the chosen target is visible in the
    // logs before the first delivery pass.
    let initial_target = resolver.resolve().await;
    info!(target = %initial_target, "Initial delivery target");

    let settings = ExtractionSettings {
        watch_dir: config.watch_dir.clone(),
        archive_dir: config.archive_dir.clone(),
        markers: config.markers.clone(),
        max_part_size: config.max_part_size,
    };

    let extraction_queue = Arc::clone(&queue);
    let extract_interval = config.extract_interval;
    let extraction_task = tokio::spawn(async move {
        extraction::run(settings, extraction_queue.as_ref(), extract_interval).await;
    });

    let deliver_interval = config.deliver_interval;
    let delivery_task = tokio::spawn(async move {
        delivery::run(
            queue.as_ref(),
            &resolver,
            transport.as_ref(),
            deliver_interval,
        )
        .await;
    });

    info!("report-relay started");
    let (extraction_result, delivery_result) = tokio::join!(extraction_task, delivery_task);
    extraction_result.context("Extraction loop terminated unexpectedly")?;
    delivery_result.context("Delivery loop terminated unexpectedly")?;
    Ok(())
}

/// Creates the directories this process owns if they are missing. The watch
/// directory is external input and is never created here.
fn ensure_dirs(config: &Config) -> Result<()> {
    for dir in [&config.archive_dir, &config.queue_dir] {
        if !dir.is_dir() {
            info!(dir = %dir.display(), "Creating directory");
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {dir:?}"))?;
        }
    }
    Ok(())
}
