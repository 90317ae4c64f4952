//! Test helper impls

use crate::{
    client::{EventSource, RunOracle},
    error::{RequestError, RequestResult},
};
use async_trait::async_trait;
use runtally_primitives::{Address, BlockNumber, RunEndedEvent, RunId, RunMetadata};
use std::{
    collections::HashMap,
    ops::Range,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

/// Deterministic run id from a small seed.
pub fn run_id(seed: u8) -> RunId {
    RunId([seed; 32])
}

/// Deterministic address from a small seed.
pub fn address(seed: u8) -> Address {
    Address([seed; 20])
}

/// A `RunEnded` event with seeded identifiers.
pub fn run_ended(seed: u8, runner_id: u64) -> RunEndedEvent {
    RunEndedEvent { run_id: run_id(seed), runner_id, recipient: address(seed) }
}

/// An in-memory ledger for driver and resolver tests.
///
/// Events live at fixed heights, run metadata is a plain map, and oracle
/// lookups can be scripted to fail a number of times before succeeding. All
/// calls are counted so tests can assert the short-circuit behavior.
#[derive(Debug, Default)]
pub struct TestLedger {
    head: BlockNumber,
    events: Vec<(BlockNumber, RunEndedEvent)>,
    runs: HashMap<RunId, RunMetadata>,
    /// Remaining scripted failures per run id.
    failures: Mutex<HashMap<RunId, u64>>,
    fail_queries: bool,
    oracle_calls: AtomicU64,
    query_calls: AtomicU64,
}

impl TestLedger {
    /// A ledger whose head is at `head`.
    pub fn new(head: BlockNumber) -> Self {
        Self { head, ..Default::default() }
    }

    /// Records an event at `height` along with the metadata the oracle
    /// reports for its run.
    pub fn with_run(mut self, height: BlockNumber, event: RunEndedEvent, meta: RunMetadata) -> Self {
        self.runs.insert(event.run_id, meta);
        self.events.push((height, event));
        self
    }

    /// Fails the next `count` oracle lookups for `run_id`.
    pub fn with_oracle_failures(self, run_id: RunId, count: u64) -> Self {
        self.failures.lock().unwrap().insert(run_id, count);
        self
    }

    /// Makes every event query fail.
    pub fn with_failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Number of `run_by_id` calls served, failed ones included.
    pub fn oracle_calls(&self) -> u64 {
        self.oracle_calls.load(Ordering::SeqCst)
    }

    /// Number of event queries served.
    pub fn query_calls(&self) -> u64 {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for TestLedger {
    async fn head_height(&self) -> RequestResult<BlockNumber> {
        Ok(self.head)
    }

    async fn events_in_range(
        &self,
        range: Range<BlockNumber>,
    ) -> RequestResult<Vec<RunEndedEvent>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(RequestError::Transport("scripted query failure".to_string()))
        }
        Ok(self
            .events
            .iter()
            .filter(|(height, _)| range.contains(height))
            .map(|(_, event)| event.clone())
            .collect())
    }
}

#[async_trait]
impl RunOracle for TestLedger {
    async fn run_by_id(&self, run_id: &RunId) -> RequestResult<RunMetadata> {
        self.oracle_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(remaining) = self.failures.lock().unwrap().get_mut(run_id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(RequestError::Rpc("scripted oracle failure".to_string()))
            }
        }
        self.runs
            .get(run_id)
            .copied()
            .ok_or_else(|| RequestError::Rpc(format!("unknown run {run_id}")))
    }
}
