use dashmap::DashMap;
use tracing::trace;

use super::cancel::StopSignal;
use super::trie::{PrefixIndex, ROOT};
use crate::metrics::LineScan;

/// Which family a scanned line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Row,
    Column,
}

/// Concurrent per-word occurrence counts.
///
/// Keys borrow the words stored in the [`PrefixIndex`], so the counter
/// cannot outlive the index it was filled from.
#[derive(Debug, Default)]
pub struct OccurrenceCounter<'a> {
    counts: DashMap<&'a str, usize>,
}

impl<'a> OccurrenceCounter<'a> {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    /// Adds one occurrence of `word`, creating the entry if needed.
    #[inline]
    pub fn increment(&self, word: &'a str) {
        *self.counts.entry(word).or_insert(0) += 1;
    }

    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).map(|count| *count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Consumes the counter, yielding every `(word, count)` pair.
    pub fn into_counts(self) -> Vec<(&'a str, usize)> {
        self.counts.into_iter().collect()
    }
}

/// Finds every indexed word occurring in `line` and counts it.
///
/// Each start position walks the index until the line ends or a character
/// has no matching child; every terminal node passed is one occurrence.
/// `stop` is polled before each start position and counts made before it
/// fired are kept.
///
/// A single-character word occupies one cell whichever way it is read, so
/// column scans leave length-1 matches to the row scan of the same cell.
pub fn scan_line<'a, S>(
    line: &[char],
    kind: LineKind,
    index: &'a PrefixIndex,
    counter: &OccurrenceCounter<'a>,
    stop: &S,
) -> LineScan
where
    S: StopSignal + ?Sized,
{
    let min_len = match kind {
        LineKind::Row => 1,
        LineKind::Column => 2,
    };
    let mut scan = LineScan::default();

    for start in 0..line.len() {
        if stop.should_stop() {
            trace!("Scan of {:?} stopped at position {}", kind, start);
            scan.interrupted = true;
            return scan;
        }
        scan.positions += 1;

        let mut node = ROOT;
        for (depth, &ch) in line[start..].iter().enumerate() {
            match index.child(node, ch) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(word) = index.word_at(node) {
                if depth + 1 >= min_len {
                    counter.increment(word);
                    scan.matches += 1;
                }
            }
        }
    }

    scan
}
