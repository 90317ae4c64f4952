//! Client abstractions over the ledger.
//!
//! The sync pipeline only ever talks to the ledger through two seams: an
//! [`EventSource`] that answers bounded event queries, and a [`RunOracle`]
//! that resolves a run id into full run metadata. The JSON-RPC client
//! implements both; tests swap in the mock from [`test_utils`].

pub mod client;
pub mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{EventSource, RunOracle};
pub use error::{RequestError, RequestResult};
