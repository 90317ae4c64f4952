use crate::{Address, RunId};

/// A decoded `RunEnded` log from the game contract.
///
/// Carries just enough identity to resolve the full run through the oracle;
/// it is not stored anywhere beyond the resolution that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEndedEvent {
    /// The run that ended.
    pub run_id: RunId,
    /// The token id of the runner that performed the run.
    pub runner_id: u64,
    /// The account the run paid out to.
    pub recipient: Address,
}
