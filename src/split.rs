//! Oversize-payload splitting.

use tracing::warn;

/// Hard cap on the number of parts produced for a single report.
pub const MAX_PARTS: usize = 10;

/// Joins `lines` under a `title` line and slices the result into deliverable
/// parts.
///
/// Within `max_part_size` characters the combined text is returned as a
/// single unmodified part. Oversize text is cut into consecutive chunks of
/// at most `max_part_size` characters, each carrying its own `part {n}`
/// label line. Concatenating the chunks with the label lines stripped
/// restores the combined text exactly. Content past [`MAX_PARTS`] chunks is
/// dropped; the truncation is logged, never fatal.
pub fn split(title: &str, lines: &[String], max_part_size: usize) -> Vec<String> {
    let mut text = String::from(title);
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }

    if text.chars().count() <= max_part_size {
        return vec![text];
    }

    let mut chunks = chunk_chars(&text, max_part_size);
    if chunks.len() > MAX_PARTS {
        let dropped: usize = chunks[MAX_PARTS..]
            .iter()
            .map(|chunk| chunk.chars().count())
            .sum();
        warn!(
            title = %title,
            parts = chunks.len(),
            cap = MAX_PARTS,
            dropped_chars = dropped,
            "Report exceeds the part cap, truncating"
        );
        chunks.truncate(MAX_PARTS);
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| format!("part {}\n{}", i + 1, chunk))
        .collect()
}

/// Cuts `text` into consecutive chunks of at most `max_chars` characters,
/// never splitting inside a UTF-8 code point.
fn chunk_chars(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
