use crate::error::RequestResult;
use async_trait::async_trait;
use runtally_primitives::{BlockNumber, RunEndedEvent, RunId, RunMetadata};
use std::ops::Range;

/// The ledger's event stream, queried one bounded window at a time.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// The current head height of the ledger.
    async fn head_height(&self) -> RequestResult<BlockNumber>;

    /// All `RunEnded` events within `[range.start, range.end)`.
    ///
    /// Across contiguous, non-overlapping windows every event is returned
    /// exactly once. No ordering is guaranteed within a window.
    async fn events_in_range(
        &self,
        range: Range<BlockNumber>,
    ) -> RequestResult<Vec<RunEndedEvent>>;
}

/// Resolves a run id into the full metadata recorded on the ledger.
///
/// Ledger data is immutable once a run has ended, so resolving the same id
/// twice yields the same metadata.
#[async_trait]
pub trait RunOracle: Send + Sync {
    /// Looks up the metadata recorded for `run_id`.
    async fn run_by_id(&self, run_id: &RunId) -> RequestResult<RunMetadata>;
}
