use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks work done by a single search
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    // Word stream metrics
    words_read: Arc<AtomicU64>,
    words_indexed: Arc<AtomicU64>,
    duplicates_skipped: Arc<AtomicU64>,
    ineligible_skipped: Arc<AtomicU64>,

    // Scan metrics
    lines_scanned: Arc<AtomicU64>,
    lines_interrupted: Arc<AtomicU64>,
    positions_visited: Arc<AtomicU64>,
    matches_recorded: Arc<AtomicU64>,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self {
            words_read: Arc::new(AtomicU64::new(0)),
            words_indexed: Arc::new(AtomicU64::new(0)),
            duplicates_skipped: Arc::new(AtomicU64::new(0)),
            ineligible_skipped: Arc::new(AtomicU64::new(0)),
            lines_scanned: Arc::new(AtomicU64::new(0)),
            lines_interrupted: Arc::new(AtomicU64::new(0)),
            positions_visited: Arc::new(AtomicU64::new(0)),
            matches_recorded: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a word pulled from the word stream
    pub fn record_word_read(&self) {
        self.words_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_word_indexed(&self) {
        self.words_indexed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a word dropped for being empty or longer than the grid is wide
    pub fn record_ineligible(&self) {
        self.ineligible_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the outcome of one line scan
    pub fn record_line(&self, scan: &LineScan) {
        self.lines_scanned.fetch_add(1, Ordering::Relaxed);
        if scan.interrupted {
            self.lines_interrupted.fetch_add(1, Ordering::Relaxed);
        }
        self.positions_visited
            .fetch_add(scan.positions as u64, Ordering::Relaxed);
        self.matches_recorded
            .fetch_add(scan.matches as u64, Ordering::Relaxed);
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            words_read: self.words_read.load(Ordering::Relaxed),
            words_indexed: self.words_indexed.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            ineligible_skipped: self.ineligible_skipped.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            lines_interrupted: self.lines_interrupted.load(Ordering::Relaxed),
            positions_visited: self.positions_visited.load(Ordering::Relaxed),
            matches_recorded: self.matches_recorded.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Words read/indexed: {}/{}\n\
             Words skipped (duplicate/ineligible): {}/{}\n\
             Lines scanned/interrupted: {}/{}\n\
             Start positions visited: {}\n\
             Matches recorded: {}",
            stats.words_read,
            stats.words_indexed,
            stats.duplicates_skipped,
            stats.ineligible_skipped,
            stats.lines_scanned,
            stats.lines_interrupted,
            stats.positions_visited,
            stats.matches_recorded
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of scanning a single line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineScan {
    /// Start positions walked
    pub positions: usize,
    /// Counter increments made
    pub matches: usize,
    /// Whether cancellation stopped the scan before the end of the line
    pub interrupted: bool,
}

/// Statistics about one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub words_read: u64,
    pub words_indexed: u64,
    pub duplicates_skipped: u64,
    pub ineligible_skipped: u64,
    pub lines_scanned: u64,
    pub lines_interrupted: u64,
    pub positions_visited: u64,
    pub matches_recorded: u64,
}
