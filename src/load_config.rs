use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{Config, TransportSelection};
use crate::extract::{Marker, Matcher};

#[derive(Deserialize)]
struct StaticConfig {
    watch_dir: std::path::PathBuf,
    archive_dir: std::path::PathBuf,
    queue_dir: std::path::PathBuf,
    #[serde(default)]
    markers: Vec<MarkerYaml>,
    extract_interval_secs: u64,
    deliver_interval_secs: u64,
    discovery_url: String,
    default_addr: String,
    account_id: String,
    max_part_size: usize,
    transport: TransportYaml,
}

#[derive(Deserialize)]
struct MarkerYaml {
    name: String,
    start: String,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    include_boundaries: bool,
    #[serde(default)]
    kind: MatchKindYaml,
}

#[derive(Deserialize, Default, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum MatchKindYaml {
    #[default]
    Literal,
    Regex,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TransportYaml {
    Http,
    Stream { port: u16 },
}

/// Loads the static YAML config file and validates it into a runtime
/// [`Config`]. Every shape error surfaces here, before any loop starts.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => conf,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if static_conf.markers.is_empty() {
        error!("Config declares no markers");
        anyhow::bail!("Config must declare at least one marker");
    }
    if static_conf.max_part_size == 0 {
        error!("max_part_size is zero");
        anyhow::bail!("max_part_size must be at least 1");
    }
    if static_conf.account_id.trim().is_empty() {
        error!("account_id is empty");
        anyhow::bail!("account_id must not be empty");
    }

    let mut markers = Vec::with_capacity(static_conf.markers.len());
    for marker in static_conf.markers {
        markers.push(compile_marker(marker)?);
    }

    let transport = match static_conf.transport {
        TransportYaml::Http => TransportSelection::Http,
        TransportYaml::Stream { port } => TransportSelection::Stream { port },
    };

    info!(
        markers_count = markers.len(),
        transport = ?transport,
        watch_dir = %static_conf.watch_dir.display(),
        "Config loaded and validated successfully"
    );

    Ok(Config {
        watch_dir: static_conf.watch_dir,
        archive_dir: static_conf.archive_dir,
        queue_dir: static_conf.queue_dir,
        markers,
        extract_interval: Duration::from_secs(static_conf.extract_interval_secs),
        deliver_interval: Duration::from_secs(static_conf.deliver_interval_secs),
        discovery_url: static_conf.discovery_url,
        default_addr: static_conf.default_addr,
        account_id: static_conf.account_id,
        max_part_size: static_conf.max_part_size,
        transport,
    })
}

fn compile_marker(raw: MarkerYaml) -> Result<Marker> {
    if raw.name.trim().is_empty() {
        error!("Marker with an empty name in config");
        anyhow::bail!("Every marker must have a non-empty name");
    }
    if raw.start.is_empty() {
        error!(marker = %raw.name, "Marker has an empty start pattern");
        anyhow::bail!("Marker {:?} has an empty start pattern", raw.name);
    }

    let start = compile_matcher(&raw.name, raw.kind, raw.start)?;
    // An absent or empty end pattern means the report runs to end of file.
    let end = match raw.end {
        Some(pattern) if !pattern.is_empty() => {
            Some(compile_matcher(&raw.name, raw.kind, pattern)?)
        }
        _ => None,
    };

    info!(
        marker = %raw.name,
        has_end = end.is_some(),
        include_boundaries = raw.include_boundaries,
        "Parsed marker from config"
    );
    Ok(Marker {
        name: raw.name,
        start,
        end,
        include_boundaries: raw.include_boundaries,
    })
}

fn compile_matcher(name: &str, kind: MatchKindYaml, pattern: String) -> Result<Matcher> {
    match kind {
        MatchKindYaml::Literal => Ok(Matcher::Literal(pattern)),
        MatchKindYaml::Regex => match Regex::new(&pattern) {
            Ok(re) => Ok(Matcher::Pattern(re)),
            Err(e) => {
                error!(marker = %name, pattern = %pattern, error = %e, "Invalid marker regex");
                Err(anyhow::anyhow!("Invalid regex for marker {name:?}: {e}"))
            }
        },
    }
}
