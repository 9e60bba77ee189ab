//! Marker-based section extraction.
//!
//! A [`Marker`] names one report and describes where it starts and ends
//! within a file's lines. [`extract`] scans the lines once: searching until
//! the start condition matches, then collecting until the end condition
//! matches (or input runs out). Markers are evaluated independently against
//! the same lines, so overlapping sections across markers are fine.

use regex::Regex;
use tracing::debug;

/// How a marker pattern is tested against a line.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Plain substring containment.
    Literal(String),
    /// Compiled regular expression.
    Pattern(Regex),
}

impl Matcher {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Matcher::Literal(needle) => line.contains(needle.as_str()),
            Matcher::Pattern(re) => re.is_match(line),
        }
    }
}

/// A validated marker, produced from configuration at load time.
#[derive(Debug, Clone)]
pub struct Marker {
    pub name: String,
    pub start: Matcher,
    /// `None` means the report runs to the end of the file.
    pub end: Option<Matcher>,
    /// Whether the matched start/end lines themselves belong to the report.
    pub include_boundaries: bool,
}

/// One report extracted from a source file. Consumed immediately by the
/// splitter, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReport {
    pub marker_name: String,
    pub lines: Vec<String>,
}

/// Scans `lines` in order for the section delimited by `marker`.
///
/// Returns `None` when the start condition never matches; that is an empty
/// result, not an error. The start line is consumed by the match (included
/// only with `include_boundaries`), and the end condition is tested only on
/// subsequent lines. An end pattern that never matches collects to the end
/// of input, as does a marker without an end pattern.
pub fn extract(marker: &Marker, lines: &[&str]) -> Option<ExtractedReport> {
    let mut collected: Vec<String> = Vec::new();
    let mut collecting = false;

    for line in lines {
        if !collecting {
            if marker.start.matches(line) {
                debug!(marker = %marker.name, line = %line, "Start match");
                if marker.include_boundaries {
                    collected.push((*line).to_string());
                }
                collecting = true;
            }
            continue;
        }
        if let Some(end) = &marker.end {
            if end.matches(line) {
                debug!(marker = %marker.name, line = %line, "End match");
                if marker.include_boundaries {
                    collected.push((*line).to_string());
                }
                return Some(ExtractedReport {
                    marker_name: marker.name.clone(),
                    lines: collected,
                });
            }
        }
        collected.push((*line).to_string());
    }

    if collecting {
        Some(ExtractedReport {
            marker_name: marker.name.clone(),
            lines: collected,
        })
    } else {
        None
    }
}
