//! Concurrent word search over the rows and columns of a grid.
//!
//! A search runs in three stages:
//! 1. The word stream is deduplicated and loaded into a [`PrefixIndex`]
//! 2. Every row and every column is handed to [`scan_line`] on a rayon pool,
//!    all of them counting into one shared [`OccurrenceCounter`]
//! 3. The counts are ranked by frequency, ties broken alphabetically
//!
//! ```rust,ignore
//! let finder = WordFinder::new(["abcd", "efgh", "ijkl", "mnop"])?;
//! let words = finder.find(Some(["abc", "gh"]), &CancellationToken::new())?;
//! assert_eq!(words, vec!["abc", "gh"]);
//! ```
pub mod cancel;
pub mod engine;
pub mod scanner;
pub mod trie;

pub use cancel::{CancellationToken, StopSignal};
pub use engine::{find, WordFinder};
pub use scanner::{scan_line, LineKind, OccurrenceCounter};
pub use trie::PrefixIndex;
