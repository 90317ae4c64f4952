use crate::error::SyncError;
use runtally_interfaces::RunOracle;
use runtally_primitives::{Run, RunEndedEvent};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Backoff schedule for oracle retries.
///
/// Resolution failures are always retried so no event is ever dropped; the
/// policy only controls how long to wait between attempts and whether to ever
/// give up. The default never gives up, matching a batch job that would
/// rather stall than lose data while the oracle is unreachable.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on the backoff delay.
    pub max_delay: Duration,
    /// Maximum number of attempts before giving up. Unbounded when `None`.
    pub max_attempts: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Sets a retry ceiling. On exhaustion the resolver surfaces
    /// [`SyncError::RetriesExhausted`] instead of looping forever.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// The delay to sleep after `attempts` failed lookups.
    ///
    /// Doubles per attempt from `base_delay`, capped at `max_delay`.
    fn backoff(&self, attempts: u64) -> Duration {
        let exp = attempts.saturating_sub(1).min(16) as u32;
        self.base_delay.saturating_mul(2u32.saturating_pow(exp)).min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempts` failures.
    fn is_exhausted(&self, attempts: u64) -> bool {
        self.max_attempts.map_or(false, |max| attempts >= max)
    }
}

/// Resolves raw `RunEnded` events into full [`Run`]s through the oracle.
#[derive(Debug)]
pub struct RunResolver<O> {
    oracle: Arc<O>,
    policy: RetryPolicy,
}

impl<O: RunOracle> RunResolver<O> {
    /// Creates a resolver over the given oracle.
    pub fn new(oracle: Arc<O>, policy: RetryPolicy) -> Self {
        Self { oracle, policy }
    }

    /// Resolves `event` into a full run.
    ///
    /// If `cached` already holds a complete run for this event it is returned
    /// as-is without consulting the oracle; this is the main cost saving of a
    /// repeated sync pass. Otherwise the oracle is queried, retrying failures
    /// per the policy. An incomplete cached run is re-resolved: its missing
    /// end time may have been recorded since.
    pub async fn resolve(
        &self,
        event: &RunEndedEvent,
        cached: Option<&Run>,
    ) -> Result<Run, SyncError> {
        if let Some(run) = cached.filter(|run| run.is_complete()) {
            debug!(target: "sync::resolver", run_id = %event.run_id, "Run already complete, skipping oracle");
            return Ok(run.clone())
        }

        let mut attempts = 0u64;
        loop {
            attempts += 1;
            match self.oracle.run_by_id(&event.run_id).await {
                Ok(meta) => return Ok(Run::from_parts(event, meta)),
                Err(err) => {
                    warn!(
                        target: "sync::resolver",
                        run_id = %event.run_id,
                        runner_id = event.runner_id,
                        recipient = %event.recipient,
                        attempts,
                        %err,
                        "Failed to resolve run"
                    );
                    if self.policy.is_exhausted(attempts) {
                        return Err(SyncError::RetriesExhausted {
                            run_id: event.run_id,
                            attempts,
                            source: err,
                        })
                    }
                    tokio::time::sleep(self.policy.backoff(attempts)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use runtally_interfaces::test_utils::{run_ended, TestLedger};
    use runtally_primitives::RunMetadata;

    fn immediate_retries() -> RetryPolicy {
        RetryPolicy { base_delay: Duration::ZERO, max_delay: Duration::ZERO, max_attempts: None }
    }

    fn complete_meta() -> RunMetadata {
        RunMetadata { earnings: Some(5), end_time: Some(200), ..Default::default() }
    }

    #[tokio::test]
    async fn complete_cached_run_skips_the_oracle() {
        let event = run_ended(1, 10);
        let ledger = Arc::new(TestLedger::new(0).with_run(0, event.clone(), complete_meta()));
        let resolver = RunResolver::new(Arc::clone(&ledger), immediate_retries());

        let cached = Run::from_parts(&event, complete_meta());
        let resolved = resolver.resolve(&event, Some(&cached)).await.unwrap();

        assert_eq!(resolved, cached);
        assert_eq!(ledger.oracle_calls(), 0);
    }

    #[tokio::test]
    async fn incomplete_cached_run_is_re_resolved() {
        let event = run_ended(2, 20);
        let ledger = Arc::new(TestLedger::new(0).with_run(0, event.clone(), complete_meta()));
        let resolver = RunResolver::new(Arc::clone(&ledger), immediate_retries());

        let stale = Run::from_parts(&event, RunMetadata::default());
        let resolved = resolver.resolve(&event, Some(&stale)).await.unwrap();

        assert!(resolved.is_complete());
        assert_eq!(ledger.oracle_calls(), 1);
    }

    #[tokio::test]
    async fn retries_until_the_oracle_answers() {
        let event = run_ended(3, 30);
        let ledger = Arc::new(
            TestLedger::new(0)
                .with_run(0, event.clone(), complete_meta())
                .with_oracle_failures(event.run_id, 3),
        );
        let resolver = RunResolver::new(Arc::clone(&ledger), immediate_retries());

        let resolved = resolver.resolve(&event, None).await.unwrap();

        assert!(resolved.is_complete());
        assert_eq!(ledger.oracle_calls(), 4);
    }

    #[tokio::test]
    async fn retry_ceiling_surfaces_a_typed_error() {
        let event = run_ended(4, 40);
        let ledger = Arc::new(
            TestLedger::new(0)
                .with_run(0, event.clone(), complete_meta())
                .with_oracle_failures(event.run_id, u64::MAX),
        );
        let resolver =
            RunResolver::new(Arc::clone(&ledger), immediate_retries().with_max_attempts(3));

        let err = resolver.resolve(&event, None).await.unwrap_err();

        assert_matches!(err, SyncError::RetriesExhausted { attempts: 3, .. });
        assert_eq!(ledger.oracle_calls(), 3);
    }

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
            max_attempts: None,
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(350));
        assert_eq!(policy.backoff(60), Duration::from_millis(350));
    }
}
