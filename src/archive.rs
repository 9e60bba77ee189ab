//! Moves fully-processed source files out of the watch directory.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;
use uuid::Uuid;

/// Copies `source` into `archive_dir` under a fresh identifier, then removes
/// the original from the watch directory. Returns the archived name.
///
/// Called at most once per source file per extraction pass, after every
/// marker has been evaluated against it. If the remove fails after the copy,
/// the file stays in the watch directory and is reprocessed on the next
/// pass; the stray archive copy duplicates storage but nothing else.
pub fn archive(source: &Path, archive_dir: &Path) -> io::Result<String> {
    let archived_name = Uuid::new_v4().simple().to_string();
    let target = archive_dir.join(&archived_name);
    fs::copy(source, &target)?;
    fs::remove_file(source)?;
    info!(
        source = %source.display(),
        archived = %target.display(),
        "Archived source file"
    );
    Ok(archived_name)
}
