pub mod config;
pub mod errors;
pub mod grid;
pub mod metrics;
pub mod results;
pub mod search;

pub use crate::config::FinderConfig;
pub use crate::errors::{SearchError, SearchResult};
pub use crate::grid::Grid;
pub use crate::results::{RankedWord, SearchOutput, SearchPhase};
pub use crate::search::{find, CancellationToken, WordFinder};
