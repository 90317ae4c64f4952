//! Incremental synchronization of `RunEnded` events into the run cache.
//!
//! The pipeline scans the ledger one bounded window at a time: fetch the
//! events in a window, resolve each into a full run through the oracle, merge
//! the results into the [`RunCache`] and persist it before moving on.
//! Persisting once per window makes the scan resumable at window granularity:
//! an interrupted pass loses at most the window in flight, and on the next
//! pass every run already complete in the cache skips the oracle entirely.

mod cache;
mod driver;
mod error;
mod partition;
mod resolver;

pub use cache::RunCache;
pub use driver::{SyncDriver, DEFAULT_BATCH_SIZE};
pub use error::{CacheError, SyncError};
pub use partition::partition;
pub use resolver::{RetryPolicy, RunResolver};
