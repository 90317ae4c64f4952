use crate::{Address, RunEndedEvent, RunId};
use serde::{Deserialize, Serialize};

/// Run metadata as recorded on the ledger, returned by the `runsById` oracle
/// lookup.
///
/// Numeric fields are optional: an in-flight run has no end time yet, and the
/// time fields use zero as an unset sentinel on chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    /// Notoriety points awarded for the run.
    pub notoriety_points: Option<u64>,
    /// Earnings in whole tokens, truncated from the 18-decimal on-chain
    /// amount.
    pub earnings: Option<u64>,
    /// When the run started, unix seconds.
    pub start_time: Option<u64>,
    /// When the run ended, unix seconds. Absent while the run is in flight.
    pub end_time: Option<u64>,
}

/// A fully resolved run, the unit stored in the run cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// The run's identifier, also the cache key.
    pub run_id: RunId,
    /// The account the run paid out to.
    pub recipient: Address,
    /// The runner that performed the run, the subject of aggregation.
    pub runner_id: u64,
    /// Notoriety points awarded for the run.
    pub notoriety_points: Option<u64>,
    /// Earnings in whole tokens.
    pub earnings: Option<u64>,
    /// When the run started, unix seconds.
    pub start_time: Option<u64>,
    /// When the run ended, unix seconds.
    pub end_time: Option<u64>,
}

impl Run {
    /// Combines an event's identity with the metadata the oracle resolved
    /// for it.
    pub fn from_parts(event: &RunEndedEvent, meta: RunMetadata) -> Self {
        Self {
            run_id: event.run_id,
            recipient: event.recipient,
            runner_id: event.runner_id,
            notoriety_points: meta.notoriety_points,
            earnings: meta.earnings,
            start_time: meta.start_time,
            end_time: meta.end_time,
        }
    }

    /// A run is complete once the ledger has recorded its end time.
    ///
    /// Complete runs are immutable; the resolver never consults the oracle
    /// for them again and the cache never replaces them with fresher data.
    pub fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_follows_end_time() {
        let event = RunEndedEvent {
            run_id: RunId([1; 32]),
            runner_id: 7,
            recipient: Address([2; 20]),
        };
        let open = Run::from_parts(&event, RunMetadata::default());
        assert!(!open.is_complete());

        let done =
            Run::from_parts(&event, RunMetadata { end_time: Some(1_700_000_000), ..Default::default() });
        assert!(done.is_complete());
        assert_eq!(done.run_id, event.run_id);
        assert_eq!(done.runner_id, 7);
    }

    #[test]
    fn cache_map_round_trips_through_json() {
        let run = Run {
            run_id: RunId([9; 32]),
            recipient: Address([3; 20]),
            runner_id: 42,
            notoriety_points: Some(12),
            earnings: Some(5),
            start_time: Some(100),
            end_time: Some(200),
        };
        let mut map = std::collections::HashMap::new();
        map.insert(run.run_id, run.clone());

        let json = serde_json::to_string(&map).unwrap();
        let decoded: std::collections::HashMap<RunId, Run> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.get(&run.run_id), Some(&run));
    }
}
