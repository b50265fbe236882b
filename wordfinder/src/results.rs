use serde::Serialize;
use tracing::debug;

use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchStats;

/// Default number of words a search reports.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A matched word together with how many times it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedWord {
    /// The matched word
    pub word: String,
    /// Number of (line, start position) pairs where the word was found
    pub count: usize,
}

/// Lifecycle of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Created,
    Validating,
    IndexBuilding,
    Scanning,
    Cancelled,
    Aggregating,
    Completed,
}

/// Phases one search has passed through, oldest first.
///
/// Starts in [`SearchPhase::Created`]; every transition is logged.
#[derive(Debug, Clone)]
pub struct PhaseTrail {
    phases: Vec<SearchPhase>,
}

impl PhaseTrail {
    pub fn new() -> Self {
        debug!("Phase: {:?}", SearchPhase::Created);
        Self {
            phases: vec![SearchPhase::Created],
        }
    }

    pub fn enter(&mut self, phase: SearchPhase) {
        debug!("Phase: {:?} -> {:?}", self.current(), phase);
        self.phases.push(phase);
    }

    pub fn current(&self) -> SearchPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(SearchPhase::Created)
    }

    pub fn contains(&self, phase: SearchPhase) -> bool {
        self.phases.contains(&phase)
    }

    pub fn into_phases(self) -> Vec<SearchPhase> {
        self.phases
    }
}

impl Default for PhaseTrail {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete outcome of a search
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    /// Best matches, highest count first, ties in ascending word order
    pub words: Vec<RankedWord>,
    /// Whether cancellation cut the search short
    pub cancelled: bool,
    /// Phase the search was in when it stopped
    #[serde(skip)]
    pub phase: SearchPhase,
    /// Every phase entered, from `Created` to the last one
    #[serde(skip)]
    pub phases: Vec<SearchPhase>,
    /// Work counters for the search
    #[serde(skip)]
    pub stats: SearchStats,
}

impl SearchOutput {
    /// The ranked words without their counts.
    pub fn word_list(&self) -> Vec<String> {
        self.words.iter().map(|ranked| ranked.word.clone()).collect()
    }

    pub fn into_word_list(self) -> Vec<String> {
        self.words.into_iter().map(|ranked| ranked.word).collect()
    }

    /// Rejects partial results: a cancelled search becomes
    /// [`SearchError::Cancelled`].
    pub fn into_complete(self) -> SearchResult<Self> {
        if self.cancelled {
            Err(SearchError::Cancelled)
        } else {
            Ok(self)
        }
    }

    pub fn to_json(&self) -> SearchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Orders `counts` by count descending then word ascending and keeps the
/// first `limit`. Zero counts are dropped.
pub fn rank<'a, I>(counts: I, limit: usize) -> Vec<RankedWord>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let mut entries: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .collect();
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(word, count)| RankedWord {
            word: word.to_owned(),
            count,
        })
        .collect()
}
