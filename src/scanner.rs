//! Full-archive scans and single-conversation re-fetch.
//!
//! [`scan`] walks every conversation folder under an archive root in one
//! synchronous pass: each folder is read, aggregated, and appended to the
//! row set while [`GlobalTotals`] accumulate. The injected progress
//! callback fires after every folder so a host UI can repaint.
//!
//! Two failure shapes are deliberately kept apart:
//!
//! - a folder that parses *successfully but empty* (no participants in any
//!   file) means the selected root is not an inbox-style export directory
//!   at all, and the scan stops early, returning what was gathered so far;
//! - a folder whose aggregation errors (the folder vanished, cannot be
//!   listed) is logged and skipped, and never triggers the early stop.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::{ConversationAggregate, aggregate_files};
use crate::error::{ArchiveError, Result};
use crate::progress::{Progress, ProgressCallback};
use crate::range::DateRange;
use crate::reader::read_folder;

/// Archive-wide totals, rebuilt from zero on every scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalTotals {
    pub total_messages: u64,
    pub sent_by_owner: u64,
    pub total_characters: u64,
}

impl GlobalTotals {
    fn absorb(&mut self, aggregate: &ConversationAggregate) {
        self.total_messages += aggregate.total_messages;
        self.sent_by_owner += aggregate.sent_by_owner;
        self.total_characters += aggregate.total_characters;
    }
}

/// Everything a full scan produces: the per-conversation row set in
/// folder-listing order, plus the archive-wide totals.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub rows: Vec<ConversationAggregate>,
    pub totals: GlobalTotals,
}

/// Scans every conversation folder under `root`.
///
/// Immediate subdirectories of `root` are visited in lexicographic name
/// order. For each, the folder's export files are read and folded into one
/// [`ConversationAggregate`]; `progress` is invoked once per processed
/// folder with `(processed, total)` counts.
///
/// The first folder that yields an empty aggregate aborts the remaining
/// iteration and the rows gathered so far are returned — the documented
/// wrong-root-directory heuristic, not an error.
///
/// # Errors
///
/// Returns [`ArchiveError::MissingDirectory`] when `root` does not exist
/// or cannot be listed.
///
/// # Example
///
/// ```rust,no_run
/// use msgtally::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> msgtally::error::Result<()> {
/// let range = DateRange::parse("2023-01-01", "2023-12-31")?;
/// let outcome = scan(Path::new("inbox"), range, "Alice", &no_progress())?;
/// println!("{} conversations, {} messages", outcome.rows.len(), outcome.totals.total_messages);
/// # Ok(())
/// # }
/// ```
pub fn scan(
    root: &Path,
    range: DateRange,
    owner: &str,
    progress: &ProgressCallback,
) -> Result<ScanOutcome> {
    let entries = fs::read_dir(root).map_err(|_| ArchiveError::missing_directory(root))?;

    let mut folders: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    let total = folders.len();
    let mut rows = Vec::new();
    let mut totals = GlobalTotals::default();

    for (index, folder) in folders.iter().enumerate() {
        let folder_id = folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut stop = false;
        match aggregate_folder(folder, &folder_id, range, owner) {
            Ok(aggregate) if aggregate.is_empty() => {
                debug!(
                    folder = %folder_id,
                    "empty aggregate: root is not an inbox export, stopping scan"
                );
                stop = true;
            }
            Ok(aggregate) => {
                totals.absorb(&aggregate);
                rows.push(aggregate);
            }
            Err(err) => {
                warn!(folder = %folder_id, error = %err, "skipping conversation folder");
            }
        }

        progress(Progress::new(index + 1, total));
        if stop {
            break;
        }
    }

    Ok(ScanOutcome { rows, totals })
}

/// Re-aggregates a single conversation folder on demand.
///
/// Used for the drill-down detail view: the `folder_id` handle from a scan
/// row is resolved against the same `root` without re-scanning everything.
///
/// # Errors
///
/// Returns [`ArchiveError::MissingDirectory`] when the folder does not
/// exist under `root`.
pub fn aggregate_one(
    root: &Path,
    folder_id: &str,
    range: DateRange,
    owner: &str,
) -> Result<ConversationAggregate> {
    let folder = root.join(folder_id);
    if !folder.is_dir() {
        return Err(ArchiveError::missing_directory(&folder));
    }
    aggregate_folder(&folder, folder_id, range, owner)
}

fn aggregate_folder(
    folder: &Path,
    folder_id: &str,
    range: DateRange,
    owner: &str,
) -> Result<ConversationAggregate> {
    let files = read_folder(folder)?;
    Ok(aggregate_files(folder_id, &files, range, owner))
}
