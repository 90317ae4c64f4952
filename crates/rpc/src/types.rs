//! Wire types for the subset of the eth namespace the client touches.

use serde::{Deserialize, Serialize};

/// `eth_getLogs` filter: a block range restricted by address and topic0.
///
/// Block bounds are inclusive on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// First block of the range, hex quantity.
    pub from_block: String,
    /// Last block of the range, hex quantity.
    pub to_block: String,
    /// Contract address to match.
    pub address: String,
    /// Topic filters; position 0 is the event signature hash.
    pub topics: Vec<String>,
}

/// A log entry returned by `eth_getLogs`.
///
/// Only the fields the decoder needs; everything else the node returns is
/// ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Indexed event arguments, topic0 first.
    pub topics: Vec<String>,
    /// Non-indexed event data, hex encoded.
    #[serde(default)]
    pub data: String,
}

/// `eth_call` request object.
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    /// Contract to call.
    pub to: String,
    /// Hex-encoded calldata.
    pub data: String,
}
