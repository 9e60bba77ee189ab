use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::extract::Marker;

/// Which delivery mechanism hands staged reports to the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSelection {
    /// JSON request/response against the collector's HTTP endpoint.
    Http,
    /// Raw byte stream to the collector's socket on `port`.
    Stream { port: u16 },
}

/// Immutable runtime configuration, validated by `load_config` and passed
/// explicitly into every component. No component reads ambient global state.
#[derive(Debug)]
pub struct Config {
    /// External input directory; read-only apart from archiving.
    pub watch_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub queue_dir: PathBuf,
    pub markers: Vec<Marker>,
    pub extract_interval: Duration,
    pub deliver_interval: Duration,
    pub discovery_url: String,
    pub default_addr: String,
    /// Account identifier (`rest_id`) carried in every outbound payload.
    pub account_id: String,
    /// Maximum characters per delivered message part.
    pub max_part_size: usize,
    pub transport: TransportSelection,
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            watch_dir = %self.watch_dir.display(),
            queue_dir = %self.queue_dir.display(),
            markers_count = self.markers.len(),
            transport = ?self.transport,
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}
