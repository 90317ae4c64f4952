//! JSON-RPC implementation of the ledger client traits.
//!
//! Speaks the eth namespace over HTTP: `eth_blockNumber` for the head
//! height, `eth_getLogs` for `RunEnded` events and `eth_call` for the
//! `runsById` run lookup.

mod abi;
mod client;
mod types;

pub use client::{RpcLedgerClient, GAME_ADDRESS};
