//! Progress reporting for archive scans.
//!
//! A scan can take a user-perceptible amount of time proportional to the
//! number of conversation folders and the size of their JSON payloads. The
//! scanner reports back through an injected callback after every completed
//! folder, so a host UI can repaint a progress bar without the core
//! depending on any particular UI technology.
//!
//! # Example
//!
//! ```rust
//! use msgtally::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     println!("Scanned {}/{}", progress.processed, progress.total);
//! });
//!
//! callback(Progress::new(3, 10));
//! ```

use std::sync::Arc;

/// Progress of a running scan, in whole conversation folders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Folders processed so far (including skipped ones).
    pub processed: usize,
    /// Total folders found under the archive root.
    pub total: usize,
}

impl Progress {
    /// Creates a new progress value.
    pub fn new(processed: usize, total: usize) -> Self {
        Self { processed, total }
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// An empty archive reports 100%.
    ///
    /// # Example
    ///
    /// ```rust
    /// use msgtally::progress::Progress;
    ///
    /// assert_eq!(Progress::new(5, 10).percentage(), 50.0);
    /// assert_eq!(Progress::new(0, 0).percentage(), 100.0);
    /// ```
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.processed as f64 / self.total as f64) * 100.0
        }
    }

    /// Returns whether every folder has been processed.
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

/// Callback type for receiving progress updates.
///
/// Thread-safe so a UI can hand the scanner a closure that posts to its
/// event loop.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
///
/// Useful when an API requires a callback but no progress display exists.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints to stderr.
///
/// Simple progress output for CLI use.
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| {
        eprint!("\rScanning conversations {}/{}", progress.processed, progress.total);
        if progress.is_complete() {
            eprintln!();
        }
    })
}
