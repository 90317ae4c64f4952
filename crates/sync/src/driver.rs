use crate::{
    cache::RunCache,
    error::SyncError,
    partition::partition,
    resolver::{RetryPolicy, RunResolver},
};
use futures_util::future::try_join_all;
use runtally_interfaces::{EventSource, RunOracle};
use runtally_primitives::BlockNumber;
use std::sync::Arc;
use tracing::{debug, info};

/// Default number of blocks fetched per event query.
pub const DEFAULT_BATCH_SIZE: u64 = 10_000;

/// Drives a full sync pass: partition the block interval, fetch each window's
/// events, resolve them and persist the cache window by window.
#[derive(Debug)]
pub struct SyncDriver<C> {
    client: Arc<C>,
    resolver: RunResolver<C>,
    batch_size: u64,
}

impl<C> SyncDriver<C>
where
    C: EventSource + RunOracle,
{
    /// Creates a driver with the default batch size and retry policy.
    pub fn new(client: Arc<C>) -> Self {
        let resolver = RunResolver::new(Arc::clone(&client), RetryPolicy::default());
        Self { client, resolver, batch_size: DEFAULT_BATCH_SIZE }
    }

    /// Sets the number of blocks per query window.
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Replaces the resolver's retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.resolver = RunResolver::new(Arc::clone(&self.client), policy);
        self
    }

    /// Runs a sync pass over `[start, end)` against `cache`.
    ///
    /// When `end` is `None` the ledger's current head is used. The cache is
    /// persisted after every window, never mid-window, so an aborted pass
    /// resumes at window granularity: re-running with the same bounds
    /// re-fetches events but skips the oracle for every run already complete
    /// in the cache, converging on the same final cache as a single
    /// uninterrupted pass.
    pub async fn run(
        &self,
        cache: &mut RunCache,
        start: BlockNumber,
        end: Option<BlockNumber>,
    ) -> Result<(), SyncError> {
        let end = match end {
            Some(end) => end,
            None => self.client.head_height().await?,
        };

        let windows = partition(start, end, self.batch_size);
        info!(target: "sync", start, end, windows = windows.len(), "Starting sync pass");

        for window in windows {
            let events = self.client.events_in_range(window.clone()).await?;
            debug!(target: "sync", range = ?window, events = events.len(), "Fetched window");

            // Resolutions within a window are independent and run
            // concurrently. The cache is read only before the fan-out (the
            // short-circuit hints) and written only after all of them settle,
            // keeping it single-writer.
            let pending: Vec<_> = events
                .iter()
                .map(|event| {
                    let cached = cache.get(&event.run_id).cloned();
                    async move { self.resolver.resolve(event, cached.as_ref()).await }
                })
                .collect();
            let resolved = try_join_all(pending).await?;

            for run in resolved {
                cache.insert(run);
            }
            cache.save()?;
            info!(
                target: "sync",
                range = ?window,
                events = events.len(),
                total = cache.len(),
                "Window persisted"
            );
        }

        Ok(())
    }
}
