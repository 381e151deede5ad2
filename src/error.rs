//! Error taxonomy for the interaction layer
//!
//! Every operation reports exactly one of these kinds at its boundary.
//! Local failures (validation, identifier resolution) are raised before any
//! network or persistence side effect; ledger-side failures carry the
//! provider's message verbatim.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad or missing user input, detected before any network access.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Pool identifier does not match the `pool<index>` form.
    #[error("invalid pool identifier: {0}")]
    InvalidIdentifier(String),

    /// Pool identifier is well-formed but unknown to the registry.
    #[error("pool not found: {0}")]
    NotFound(String),

    /// State-changing call attempted without an active wallet identity.
    #[error("wallet not connected")]
    NotConnected,

    /// Codec rejected the arguments (type mismatch, arity, range).
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Returned or logged data does not match the expected shape.
    #[error("decoding failed: {0}")]
    Decoding(String),

    /// Read-only call rejected by the node or transport.
    #[error("query failed: {0}")]
    Query(String),

    /// Transaction rejected by the wallet or reverted on-chain.
    #[error("transaction failed: {0}")]
    Transaction(String),
}

impl ClientError {
    /// Stable kind tag, for callers that report failures structurally.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "validation",
            ClientError::InvalidIdentifier(_) => "invalid_identifier",
            ClientError::NotFound(_) => "not_found",
            ClientError::NotConnected => "not_connected",
            ClientError::Encoding(_) => "encoding",
            ClientError::Decoding(_) => "decoding",
            ClientError::Query(_) => "query",
            ClientError::Transaction(_) => "transaction",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
