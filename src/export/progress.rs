//! Progress tracking for export runs
//!
//! This module provides progress feedback over the set of index export
//! tasks, counting finished indices against the run total.

use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress tracker for one export run
///
/// Tracks how many index exports have finished and optionally displays
/// a progress bar. Shared across worker tasks.
pub struct ProgressTracker {
    /// Number of indices finished so far (success or failure)
    finished: AtomicU64,

    /// Progress bar (optional, can be disabled)
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    /// Create a new progress tracker
    ///
    /// # Arguments
    /// * `total` - Total number of indices in the run
    /// * `enable_bar` - Whether to display a progress bar
    ///
    /// # Returns
    /// * `Self` - New progress tracker instance
    pub fn new(total: u64, enable_bar: bool) -> Self {
        let bar = if enable_bar {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} indices {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        Self {
            finished: AtomicU64::new(0),
            bar,
        }
    }

    /// Record one finished index export
    pub fn index_finished(&self) {
        let done = self.finished.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some(ref bar) = self.bar {
            bar.set_position(done);
        }
    }

    /// Number of indices finished so far
    pub fn finished(&self) -> u64 {
        self.finished.load(Ordering::Relaxed)
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_tracker_counts() {
        let tracker = ProgressTracker::new(3, false);
        tracker.index_finished();
        tracker.index_finished();
        assert_eq!(tracker.finished(), 2);
    }

    #[test]
    fn test_progress_tracker_without_bar() {
        let tracker = ProgressTracker::new(0, false);
        tracker.finish();
        assert_eq!(tracker.finished(), 0);
    }
}
