use rayon::prelude::*;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, trace, warn};

use super::cancel::{CancellationToken, StopSignal};
use super::scanner::{scan_line, LineKind, OccurrenceCounter};
use super::trie::PrefixIndex;
use crate::config::FinderConfig;
use crate::errors::{SearchError, SearchResult};
use crate::grid::Grid;
use crate::metrics::{LineScan, SearchMetrics};
use crate::results::{rank, PhaseTrail, SearchOutput, SearchPhase};

/// Stops scanners when the caller cancels or a sibling worker faults.
struct ScanStop<'a> {
    cancel: &'a CancellationToken,
    abort: &'a AtomicBool,
}

impl StopSignal for ScanStop<'_> {
    #[inline]
    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.abort.load(Ordering::Relaxed)
    }
}

/// One unit of scanning work
#[derive(Debug, Clone, Copy)]
enum Line {
    Row(usize),
    Column(usize),
}

/// Searches a validated grid for words from a word stream.
#[derive(Debug, Clone)]
pub struct WordFinder {
    grid: Grid,
    config: FinderConfig,
}

impl WordFinder {
    /// Validates `rows` and prepares a finder with the default configuration.
    pub fn new<I, S>(rows: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(rows, FinderConfig::default())
    }

    pub fn with_config<I, S>(rows: I, config: FinderConfig) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        debug!("Validating grid");
        config.validate()?;
        let grid = Grid::new(rows)?;
        debug!("Grid is {}x{}", grid.rows(), grid.cols());
        Ok(Self { grid, config })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Returns the most frequent words of `word_stream` found in the grid.
    ///
    /// `None` fails with [`SearchError::NullInput`]; an empty stream yields an
    /// empty list. Cancellation is best-effort and the words ranked so far
    /// are returned.
    pub fn find<I, S>(
        &self,
        word_stream: Option<I>,
        cancel: &CancellationToken,
    ) -> SearchResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.search(word_stream, cancel)?.into_word_list())
    }

    /// Like [`WordFinder::find`] but reports counts, the final phase and
    /// whether the search was cancelled.
    pub fn search<I, S>(
        &self,
        word_stream: Option<I>,
        cancel: &CancellationToken,
    ) -> SearchResult<SearchOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trail = PhaseTrail::new();
        trail.enter(SearchPhase::Validating);
        let word_stream =
            word_stream.ok_or_else(|| SearchError::null_input("word stream was not provided"))?;

        info!(
            "Starting search over {}x{} grid",
            self.grid.rows(),
            self.grid.cols()
        );
        let metrics = SearchMetrics::new();
        trail.enter(SearchPhase::IndexBuilding);

        let index = self.build_index(word_stream, cancel, &metrics)?;
        if cancel.is_cancelled() {
            trail.enter(SearchPhase::Cancelled);
        } else {
            trail.enter(SearchPhase::Scanning);
        }

        let counter = OccurrenceCounter::new();
        if !index.is_empty() && trail.current() == SearchPhase::Scanning {
            self.scan_all(&index, &counter, cancel, &metrics)?;
            if cancel.is_cancelled() {
                trail.enter(SearchPhase::Cancelled);
            }
        }

        let cancelled = trail.contains(SearchPhase::Cancelled);
        if cancelled {
            warn!("Search cancelled, ranking partial counts");
        }
        trail.enter(SearchPhase::Aggregating);
        let words = rank(counter.into_counts(), self.config.max_results);

        let phase = if cancelled {
            SearchPhase::Cancelled
        } else {
            trail.enter(SearchPhase::Completed);
            SearchPhase::Completed
        };

        metrics.log_stats();
        info!("Search complete. Ranked {} words", words.len());

        Ok(SearchOutput {
            words,
            cancelled,
            phase,
            phases: trail.into_phases(),
            stats: metrics.get_stats(),
        })
    }

    /// Consumes the word stream into a prefix index, keeping the first copy
    /// of each word that fits within the grid's column count.
    fn build_index<I, S>(
        &self,
        word_stream: I,
        cancel: &CancellationToken,
        metrics: &SearchMetrics,
    ) -> SearchResult<PrefixIndex>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let max_len = self.grid.cols();
        let mut index = PrefixIndex::new();
        let mut seen: HashSet<String> = HashSet::new();

        for word in word_stream {
            if cancel.is_cancelled() {
                debug!("Cancelled while indexing after {} words", index.len());
                break;
            }
            let word = word.as_ref();
            metrics.record_word_read();

            if seen.contains(word) {
                trace!("Skipping duplicate word '{}'", word);
                metrics.record_duplicate();
                continue;
            }
            seen.insert(word.to_owned());

            let len = word.chars().count();
            if len == 0 || len > max_len {
                trace!("Skipping word '{}' of length {}", word, len);
                metrics.record_ineligible();
                continue;
            }

            index.insert(word)?;
            metrics.record_word_indexed();
        }

        debug!(
            "Indexed {} words into {} nodes",
            index.len(),
            index.node_count()
        );
        Ok(index)
    }

    /// Scans every row and every column on a bounded pool.
    fn scan_all<'a>(
        &self,
        index: &'a PrefixIndex,
        counter: &OccurrenceCounter<'a>,
        cancel: &CancellationToken,
        metrics: &SearchMetrics,
    ) -> SearchResult<()> {
        self.scan_lines(cancel, metrics, |line, stop| {
            self.scan_one(line, index, counter, stop)
        })
    }

    /// Runs `scan` for every line. A panicking scan aborts the lines not yet
    /// started and the panics come back as one [`SearchError::WorkerFault`].
    fn scan_lines<F>(
        &self,
        cancel: &CancellationToken,
        metrics: &SearchMetrics,
        scan: F,
    ) -> SearchResult<()>
    where
        F: Fn(Line, &ScanStop<'_>) -> LineScan + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.thread_count.get())
            .build()
            .map_err(|e| SearchError::thread_pool(e.to_string()))?;

        let lines: Vec<Line> = (0..self.grid.rows())
            .map(Line::Row)
            .chain((0..self.grid.cols()).map(Line::Column))
            .collect();
        debug!(
            "Dispatching {} line scans on {} threads",
            lines.len(),
            self.config.thread_count
        );

        let abort = AtomicBool::new(false);
        let faults = Mutex::new(Vec::<String>::new());
        let stop = ScanStop {
            cancel,
            abort: &abort,
        };

        pool.install(|| {
            lines.par_iter().for_each(|&line| {
                if stop.should_stop() {
                    return;
                }
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| scan(line, &stop)));
                match outcome {
                    Ok(scanned) => metrics.record_line(&scanned),
                    Err(payload) => {
                        abort.store(true, Ordering::Relaxed);
                        let msg = panic_message(payload.as_ref());
                        warn!("Scan of {:?} faulted: {}", line, msg);
                        faults
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .push(format!("{line:?}: {msg}"));
                    }
                }
            });
        });

        let faults = faults
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !faults.is_empty() {
            return Err(SearchError::worker_fault(faults.join("; ")));
        }
        Ok(())
    }

    fn scan_one<'a>(
        &self,
        line: Line,
        index: &'a PrefixIndex,
        counter: &OccurrenceCounter<'a>,
        stop: &ScanStop<'_>,
    ) -> LineScan {
        match line {
            Line::Row(row) => {
                trace!("Scanning row {}", row);
                scan_line(self.grid.row(row), LineKind::Row, index, counter, stop)
            }
            Line::Column(col) => {
                trace!("Scanning column {}", col);
                let column = self.grid.column(col);
                scan_line(&column, LineKind::Column, index, counter, stop)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Validates `rows` and searches them for `word_stream` in one call.
pub fn find<R, RS, I, S>(
    rows: R,
    word_stream: Option<I>,
    cancel: &CancellationToken,
) -> SearchResult<Vec<String>>
where
    R: IntoIterator<Item = RS>,
    RS: AsRef<str>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    WordFinder::new(rows)?.find(word_stream, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn finder(rows: &[&str]) -> WordFinder {
        WordFinder::new(rows.iter().copied()).unwrap()
    }

    #[test]
    fn test_find_rows_and_columns() {
        let finder = finder(&["abcd", "efgh", "ijkl", "mnop"]);
        let output = finder
            .search(Some(["aei", "fgh", "dhl", "xyz"]), &CancellationToken::new())
            .unwrap();

        assert_eq!(output.word_list(), vec!["aei", "dhl", "fgh"]);
        assert!(output.words.iter().all(|w| w.count == 1));
        assert_eq!(output.phase, SearchPhase::Completed);
        assert!(!output.cancelled);
        assert_eq!(output.stats.lines_scanned, 8);
        assert_eq!(
            output.phases,
            vec![
                SearchPhase::Created,
                SearchPhase::Validating,
                SearchPhase::IndexBuilding,
                SearchPhase::Scanning,
                SearchPhase::Aggregating,
                SearchPhase::Completed,
            ]
        );
    }

    #[test]
    fn test_null_stream() {
        let finder = finder(&["abc"]);
        let err = finder
            .find(None::<Vec<String>>, &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, SearchError::NullInput(_)));
    }

    #[test]
    fn test_empty_stream() {
        let finder = finder(&["abc"]);
        let words = finder
            .find(Some(Vec::<String>::new()), &CancellationToken::new())
            .unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_filters_long_empty_and_duplicate_words() {
        let finder = finder(&["abc", "def"]);
        let output = finder
            .search(
                Some(["ab", "", "ab", "abcd", "ad"]),
                &CancellationToken::new(),
            )
            .unwrap();

        assert_eq!(output.word_list(), vec!["ab", "ad"]);
        assert_eq!(output.stats.words_read, 5);
        assert_eq!(output.stats.words_indexed, 2);
        assert_eq!(output.stats.duplicates_skipped, 1);
        assert_eq!(output.stats.ineligible_skipped, 2);
    }

    #[test]
    fn test_column_count_filter_applies_to_columns() {
        // "abc" fits down the first column but the grid is only two wide.
        let finder = finder(&["ax", "by", "cz"]);
        let words = finder
            .find(Some(["abc", "ab"]), &CancellationToken::new())
            .unwrap();
        assert_eq!(words, vec!["ab"]);
    }

    #[test]
    fn test_cancelled_before_start() {
        let finder = finder(&["abcd", "efgh"]);
        let token = CancellationToken::new();
        token.cancel();

        let output = finder.search(Some(["abc", "efg"]), &token).unwrap();
        assert!(output.words.is_empty());
        assert!(output.cancelled);
        assert_eq!(output.phase, SearchPhase::Cancelled);
        assert_eq!(output.stats.words_read, 0);
        assert_eq!(
            output.phases,
            vec![
                SearchPhase::Created,
                SearchPhase::Validating,
                SearchPhase::IndexBuilding,
                SearchPhase::Cancelled,
                SearchPhase::Aggregating,
            ]
        );
        assert!(matches!(
            output.into_complete(),
            Err(SearchError::Cancelled)
        ));
    }

    #[test]
    fn test_cancelled_while_streaming_words() {
        let finder = finder(&["abcd", "efgh"]);
        let token = CancellationToken::new();
        let trigger = token.clone();

        let stream = ["abc", "efg", "gh"].into_iter().inspect(move |word| {
            if *word == "efg" {
                trigger.cancel();
            }
        });
        let output = finder.search(Some(stream), &token).unwrap();

        assert!(output.cancelled);
        assert!(output.words.is_empty());
        assert_eq!(output.stats.words_indexed, 1);
    }

    #[test]
    fn test_max_results_from_config() {
        let config = FinderConfig {
            thread_count: NonZeroUsize::new(2).unwrap(),
            max_results: 2,
            log_level: "warn".to_string(),
        };
        let finder = WordFinder::with_config(["abcabc", "defdef"], config).unwrap();
        let words = finder
            .find(Some(["abc", "def", "bc", "ef"]), &CancellationToken::new())
            .unwrap();
        // Every word occurs twice; ties fall back to word order.
        assert_eq!(words, vec!["abc", "bc"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FinderConfig {
            max_results: 0,
            ..FinderConfig::default()
        };
        let err = WordFinder::with_config(["abc"], config).unwrap_err();
        assert!(matches!(err, SearchError::ConfigError(_)));
    }

    #[test]
    fn test_free_find() {
        let words = find(["ab", "cd"], Some(["ac", "cd"]), &CancellationToken::new()).unwrap();
        assert_eq!(words, vec!["ac", "cd"]);

        let err = find(["ab", "c"], Some(["ac"]), &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(_)));
    }

    #[test]
    fn test_worker_fault_stops_remaining_lines() {
        let config = FinderConfig {
            thread_count: NonZeroUsize::new(1).unwrap(),
            ..FinderConfig::default()
        };
        let rows = vec!["abcdefgh"; 8];
        let finder = WordFinder::with_config(rows, config).unwrap();
        let mut index = PrefixIndex::new();
        index.insert("abc").unwrap();
        let counter = OccurrenceCounter::new();
        let metrics = SearchMetrics::new();

        let err = finder
            .scan_lines(&CancellationToken::new(), &metrics, |line, stop| {
                if let Line::Row(0) = line {
                    panic!("corrupt cell");
                }
                finder.scan_one(line, &index, &counter, stop)
            })
            .unwrap_err();

        match err {
            SearchError::WorkerFault(msg) => {
                assert!(msg.contains("Row(0)"), "{msg}");
                assert!(msg.contains("corrupt cell"), "{msg}");
            }
            other => panic!("expected a worker fault, got {other:?}"),
        }
        let total = (finder.grid().rows() + finder.grid().cols()) as u64;
        assert!(metrics.get_stats().lines_scanned < total);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "worker panicked");
    }
}
