//! Ranked aggregation of cached runs into a per-runner leaderboard.
//!
//! Derived purely from the run cache and recomputed on every invocation;
//! nothing here is persisted.

use runtally_primitives::Run;
use serde::Serialize;
use std::collections::HashMap;

/// Number of entries the leaderboard is truncated to by default.
pub const DEFAULT_TOP: usize = 10;

/// A runner's aggregate standing across their completed runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// The runner the totals belong to.
    pub runner_id: u64,
    /// Sum of earnings over the runner's completed runs.
    pub total: u64,
    /// Number of completed runs.
    pub runs: u64,
}

/// Folds runs into per-runner totals and returns the `top` runners ranked by
/// total earnings, descending.
///
/// Incomplete runs (no end time yet) are stale resolution artifacts and are
/// skipped. Completed runs with no recorded earnings count toward `runs` but
/// add nothing to `total`. Equal totals rank by ascending runner id, so the
/// output is deterministic.
pub fn leaderboard<'a>(
    runs: impl IntoIterator<Item = &'a Run>,
    top: usize,
) -> Vec<LeaderboardEntry> {
    let mut standings: HashMap<u64, LeaderboardEntry> = HashMap::new();
    for run in runs {
        if !run.is_complete() {
            continue
        }
        let entry = standings
            .entry(run.runner_id)
            .or_insert_with(|| LeaderboardEntry { runner_id: run.runner_id, total: 0, runs: 0 });
        entry.total += run.earnings.unwrap_or_default();
        entry.runs += 1;
    }

    let mut ranked: Vec<_> = standings.into_values().collect();
    ranked.sort_unstable_by(|a, b| b.total.cmp(&a.total).then(a.runner_id.cmp(&b.runner_id)));
    ranked.truncate(top);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtally_interfaces::test_utils::run_ended;
    use runtally_primitives::RunMetadata;

    fn run(seed: u8, runner_id: u64, earnings: u64) -> Run {
        Run::from_parts(
            &run_ended(seed, runner_id),
            RunMetadata { earnings: Some(earnings), end_time: Some(200), ..Default::default() },
        )
    }

    #[test]
    fn totals_and_counts_per_runner() {
        let runs = [run(1, 1, 5), run(2, 1, 3), run(3, 2, 10)];

        let ranked = leaderboard(&runs, DEFAULT_TOP);

        assert_eq!(
            ranked,
            vec![
                LeaderboardEntry { runner_id: 2, total: 10, runs: 1 },
                LeaderboardEntry { runner_id: 1, total: 8, runs: 2 },
            ]
        );
    }

    #[test]
    fn truncates_to_the_top_entries() {
        let runs: Vec<_> =
            (0..15u8).map(|seed| run(seed, seed as u64, 100 + seed as u64)).collect();

        let ranked = leaderboard(&runs, 10);

        assert_eq!(ranked.len(), 10);
        // The five lowest earners fall off the board.
        assert!(ranked.iter().all(|entry| entry.total >= 105));
        assert!(ranked.windows(2).all(|pair| pair[0].total >= pair[1].total));
    }

    #[test]
    fn equal_totals_rank_by_runner_id() {
        let runs = [run(1, 9, 7), run(2, 4, 7)];

        let ranked = leaderboard(&runs, DEFAULT_TOP);

        assert_eq!(ranked[0].runner_id, 4);
        assert_eq!(ranked[1].runner_id, 9);
    }

    #[test]
    fn incomplete_runs_are_excluded() {
        let stale = Run::from_parts(&run_ended(5, 1), RunMetadata::default());
        let runs = [run(1, 1, 5), stale];

        let ranked = leaderboard(&runs, DEFAULT_TOP);

        assert_eq!(ranked, vec![LeaderboardEntry { runner_id: 1, total: 5, runs: 1 }]);
    }

    #[test]
    fn missing_earnings_still_count_as_a_run() {
        let unpaid = Run::from_parts(
            &run_ended(6, 3),
            RunMetadata { end_time: Some(200), ..Default::default() },
        );
        let runs = [run(1, 3, 5), unpaid];

        let ranked = leaderboard(&runs, DEFAULT_TOP);

        assert_eq!(ranked, vec![LeaderboardEntry { runner_id: 3, total: 5, runs: 2 }]);
    }
}
