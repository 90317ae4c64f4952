use thiserror::Error;

/// Result alias for client requests.
pub type RequestResult<T> = Result<T, RequestError>;

/// Error variants that can happen when requesting data from the ledger
/// endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The transport failed before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The endpoint answered with a JSON-RPC error, e.g. a rate limit.
    #[error("RPC error: {0}")]
    Rpc(String),
    /// The response arrived but could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}
