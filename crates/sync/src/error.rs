use runtally_interfaces::RequestError;
use runtally_primitives::RunId;
use thiserror::Error;

/// Error when loading or persisting the run cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache file could not be read or written.
    #[error("Cache io error: {0}")]
    Io(#[from] std::io::Error),
    /// The cache contents could not be encoded.
    #[error("Cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A sync pass execution error.
///
/// Every variant is fatal to the pass: the window in flight is abandoned
/// without being saved, and previously saved windows stand. Individual run
/// resolution failures are retried inside the resolver and only surface here
/// once a configured retry ceiling is exhausted.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The event source failed while fetching a window or the head height.
    #[error("Event source request failed: {0}")]
    Source(#[from] RequestError),
    /// Persisting the cache failed.
    #[error("Failed to persist run cache: {0}")]
    Cache(#[from] CacheError),
    /// The retry ceiling was reached while resolving a run.
    ///
    /// Only possible when a maximum attempt count is configured; the default
    /// policy retries without bound.
    #[error("Gave up resolving run {run_id} after {attempts} attempts")]
    RetriesExhausted {
        /// The run that could not be resolved.
        run_id: RunId,
        /// How many lookups were attempted.
        attempts: u64,
        /// The error from the final attempt.
        #[source]
        source: RequestError,
    },
}
