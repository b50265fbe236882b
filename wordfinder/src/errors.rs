/// Error types for wordfinder.
///
/// Grid validation and a missing word stream are reported synchronously,
/// before any work is attempted:
/// ```rust,ignore
/// match WordFinder::new(rows) {
///     Ok(finder) => // Search the grid,
///     Err(SearchError::InvalidInput(msg)) => // Ragged, empty or oversized grid,
///     Err(e) => // Handle other errors
/// }
/// ```
///
/// Cancellation is best-effort: a cancelled search still returns the ranking
/// computed so far. Callers that need a complete answer turn a cancelled
/// output into [`SearchError::Cancelled`] with `SearchOutput::into_complete`.
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing input: {0}")]
    NullInput(String),
    #[error("Search was cancelled before it completed")]
    Cancelled,
    #[error("Worker fault: {0}")]
    WorkerFault(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SearchError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn null_input(msg: impl Into<String>) -> Self {
        Self::NullInput(msg.into())
    }

    pub fn worker_fault(msg: impl Into<String>) -> Self {
        Self::WorkerFault(msg.into())
    }

    pub fn thread_pool(msg: impl Into<String>) -> Self {
        Self::ThreadPool(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<::config::ConfigError> for SearchError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SearchError::invalid_input("ragged rows");
        assert!(matches!(err, SearchError::InvalidInput(_)));

        let err = SearchError::null_input("word stream");
        assert!(matches!(err, SearchError::NullInput(_)));

        let err = SearchError::worker_fault("scan panicked");
        assert!(matches!(err, SearchError::WorkerFault(_)));

        let err = SearchError::thread_pool("no threads");
        assert!(matches!(err, SearchError::ThreadPool(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_input("Grid cannot be empty.");
        assert_eq!(err.to_string(), "Invalid input: Grid cannot be empty.");

        let err = SearchError::null_input("word stream was not provided");
        assert_eq!(err.to_string(), "Missing input: word stream was not provided");

        assert_eq!(
            SearchError::Cancelled.to_string(),
            "Search was cancelled before it completed"
        );

        let err = SearchError::config_error("max_results must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: max_results must be at least 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "matrix.txt");
        let err: SearchError = io.into();
        assert!(matches!(err, SearchError::IoError(_)));
        assert_eq!(err.to_string(), "IO error: matrix.txt");
    }
}
