//! # msgtally
//!
//! A Rust library for extracting per-conversation statistics from
//! Messenger chat-archive exports.
//!
//! ## Overview
//!
//! A personal-data export is a directory tree with one subdirectory per
//! conversation, each holding one or more JSON files. msgtally walks that
//! tree, undoes the exporter's Latin-1/UTF-8 double-encoding artifact,
//! applies an inclusive calendar-date filter, and folds every conversation
//! into a single aggregate record: message, character, and media counts,
//! call durations, per-participant tallies, and the first-message
//! timestamp. Archive-wide totals accumulate alongside.
//!
//! The resulting rows load into an in-memory [`store::RowStore`] that a
//! table UI can sort (single- or multi-key, stable), search (substring,
//! case-insensitive), and filter (structured per-column predicates).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use msgtally::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let range = DateRange::parse("2023-01-01", "2023-12-31")?;
//!     let outcome = scan(Path::new("inbox"), range, "Alice", &no_progress())?;
//!
//!     let mut store = RowStore::from_aggregates(&outcome.rows);
//!     store.sort_by(Column::Messages, true);
//!
//!     for row in store.rows() {
//!         println!("{}: {} messages", row.name, row.message_count);
//!     }
//!     println!("total: {}", outcome.totals.total_messages);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`scanner`] — full-archive scans and single-conversation re-fetch
//!   - [`scan`](scanner::scan), [`aggregate_one`](scanner::aggregate_one)
//! - [`aggregate`] — per-conversation folding
//!   - [`ConversationAggregate`](aggregate::ConversationAggregate),
//!     [`ConversationKind`](aggregate::ConversationKind)
//! - [`reader`] — export schema and the per-folder reader
//! - [`encoding`] — Mojibake recovery for archive strings
//! - [`range`] — inclusive calendar-date filtering
//! - [`store`] — sortable/filterable row set
//! - [`progress`] — scan progress callbacks
//! - [`error`] — unified error types ([`ArchiveError`], [`Result`])
//!
//! The CLI-only modules [`cli`], [`config`], and [`report`] are gated
//! behind the `cli` feature.

pub mod aggregate;
pub mod encoding;
pub mod error;
pub mod progress;
pub mod range;
pub mod reader;
pub mod scanner;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod report;

// Re-export the main types at the crate root for convenience
pub use error::{ArchiveError, Result};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use msgtally::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{ArchiveError, Result};

    // Scanning
    pub use crate::scanner::{GlobalTotals, ScanOutcome, aggregate_one, scan};

    // Aggregates
    pub use crate::aggregate::{ConversationAggregate, ConversationKind, aggregate_files};

    // Reader
    pub use crate::reader::{ConversationFile, RawMessage, read_folder};

    // Date filtering
    pub use crate::range::DateRange;

    // Row store
    pub use crate::store::{Column, NumericRange, Row, RowFilter, RowStore, SortBias};

    // Progress reporting
    pub use crate::progress::{Progress, ProgressCallback, no_progress, stderr_progress};
}
