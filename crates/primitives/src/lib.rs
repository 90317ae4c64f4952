//! Commonly used types in runtally.
//!
//! This crate contains the identifier newtypes shared across the workspace
//! ([`RunId`], [`Address`]) and the run data model ([`RunEndedEvent`],
//! [`RunMetadata`], [`Run`]).

mod bytes;
mod event;
mod run;

pub use crate::{
    bytes::{Address, ParseBytesError, RunId},
    event::RunEndedEvent,
    run::{Run, RunMetadata},
};

/// A block height on the ledger.
pub type BlockNumber = u64;
