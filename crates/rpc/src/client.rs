use crate::{
    abi,
    types::{CallRequest, Filter, Log},
};
use async_trait::async_trait;
use jsonrpsee::{
    core::{client::ClientT, Error as JsonRpcError},
    http_client::{HttpClient, HttpClientBuilder},
    rpc_params,
};
use runtally_interfaces::{EventSource, RequestError, RequestResult, RunOracle};
use runtally_primitives::{BlockNumber, RunEndedEvent, RunId, RunMetadata};
use std::ops::Range;
use tracing::trace;

/// Address of the game contract emitting `RunEnded` events.
pub const GAME_ADDRESS: &str = "0x9d0c114Ac1C3cD1276B0366160B3354ca0f9377E";

/// Ledger client speaking JSON-RPC over HTTP.
#[derive(Debug, Clone)]
pub struct RpcLedgerClient {
    client: HttpClient,
    contract: String,
}

impl RpcLedgerClient {
    /// Connects to the endpoint at `url`, watching the default game contract.
    pub fn new(url: &str) -> RequestResult<Self> {
        Self::with_contract(url, GAME_ADDRESS)
    }

    /// Connects to `url`, watching `contract` for events and run lookups.
    pub fn with_contract(url: &str, contract: &str) -> RequestResult<Self> {
        let client = HttpClientBuilder::default()
            .build(url)
            .map_err(|err| RequestError::Transport(err.to_string()))?;
        Ok(Self { client, contract: contract.to_string() })
    }
}

fn convert_err(err: JsonRpcError) -> RequestError {
    match err {
        JsonRpcError::Call(call) => RequestError::Rpc(call.to_string()),
        JsonRpcError::ParseError(parse) => RequestError::Decode(parse.to_string()),
        other => RequestError::Transport(other.to_string()),
    }
}

#[async_trait]
impl EventSource for RpcLedgerClient {
    async fn head_height(&self) -> RequestResult<BlockNumber> {
        let head: String =
            self.client.request("eth_blockNumber", rpc_params![]).await.map_err(convert_err)?;
        abi::parse_quantity(&head)
    }

    async fn events_in_range(
        &self,
        range: Range<BlockNumber>,
    ) -> RequestResult<Vec<RunEndedEvent>> {
        if range.is_empty() {
            return Ok(Vec::new())
        }
        // eth_getLogs bounds are inclusive, the range is half-open.
        let filter = Filter {
            from_block: abi::format_quantity(range.start),
            to_block: abi::format_quantity(range.end - 1),
            address: self.contract.clone(),
            topics: vec![abi::RUN_ENDED_TOPIC.to_string()],
        };
        trace!(target: "rpc", ?range, "Querying RunEnded logs");
        let logs: Vec<Log> =
            self.client.request("eth_getLogs", rpc_params![filter]).await.map_err(convert_err)?;
        logs.iter().map(abi::decode_run_ended).collect()
    }
}

#[async_trait]
impl RunOracle for RpcLedgerClient {
    async fn run_by_id(&self, run_id: &RunId) -> RequestResult<RunMetadata> {
        let call = CallRequest {
            to: self.contract.clone(),
            data: abi::encode_runs_by_id_call(run_id),
        };
        trace!(target: "rpc", %run_id, "Looking up run");
        let data: String = self
            .client
            .request("eth_call", rpc_params![call, "latest"])
            .await
            .map_err(convert_err)?;
        abi::decode_run_metadata(&data)
    }
}
