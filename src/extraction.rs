//! Extraction side of the pipeline: watch directory → markers → splitter →
//! queue → archive.
//!
//! [`tick`] performs exactly one pass and is deterministic with respect to
//! time, so tests drive it directly. [`run`] repeats the pass forever on the
//! configured interval. A failure in one file is logged and skipped; it
//! never aborts the rest of the pass or the loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::archive;
use crate::extract::{extract, Marker};
use crate::queue::QueueStore;
use crate::split;

/// Settings for the extraction side, carved out of the full `Config`.
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub watch_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub markers: Vec<Marker>,
    pub max_part_size: usize,
}

/// What one extraction pass over the watch directory did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub files_seen: usize,
    pub reports_found: usize,
    pub parts_enqueued: usize,
    pub files_archived: usize,
}

/// One pass: every file in the watch directory is run through every marker;
/// extracted reports are split and staged; a file that produced at least one
/// report is archived once, after all markers ran — never once per marker.
pub fn tick<Q: QueueStore + ?Sized>(settings: &ExtractionSettings, queue: &Q) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    let files = match list_source_files(&settings.watch_dir) {
        Ok(files) => files,
        Err(e) => {
            error!(
                error = %e,
                dir = %settings.watch_dir.display(),
                "Failed to list watch directory"
            );
            return report;
        }
    };

    for path in files {
        report.files_seen += 1;
        if let Err(e) = process_file(&path, settings, queue, &mut report) {
            error!(
                error = %e,
                file = %path.display(),
                "Failed to process source file, will retry next pass"
            );
        }
    }
    report
}

/// Regular, non-hidden entries of the watch directory, sorted by name for a
/// deterministic pass.
fn list_source_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn process_file<Q: QueueStore + ?Sized>(
    path: &Path,
    settings: &ExtractionSettings,
    queue: &Q,
    report: &mut ExtractionReport,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();

    let mut report_found = false;
    for marker in &settings.markers {
        let Some(extracted) = extract(marker, &lines) else {
            debug!(marker = %marker.name, file = %path.display(), "No match");
            continue;
        };
        report_found = true;
        report.reports_found += 1;
        info!(
            marker = %marker.name,
            file = %path.display(),
            lines = extracted.lines.len(),
            "Extracted report"
        );
        for part in split::split(&extracted.marker_name, &extracted.lines, settings.max_part_size) {
            let id = queue.enqueue(&part)?;
            report.parts_enqueued += 1;
            debug!(id = %id, marker = %marker.name, "Staged report part");
        }
    }

    if report_found {
        let archived = archive::archive(path, &settings.archive_dir)?;
        report.files_archived += 1;
        info!(file = %path.display(), archived = %archived, "Source file archived");
    }
    Ok(())
}

/// Runs extraction passes for the lifetime of the process.
pub async fn run<Q: QueueStore + ?Sized>(
    settings: ExtractionSettings,
    queue: &Q,
    interval: Duration,
) {
    loop {
        let report = tick(&settings, queue);
        if report.files_seen > 0 {
            info!(
                files = report.files_seen,
                reports = report.reports_found,
                parts = report.parts_enqueued,
                archived = report.files_archived,
                "Extraction pass complete"
            );
        }
        tokio::time::sleep(interval).await;
    }
}
