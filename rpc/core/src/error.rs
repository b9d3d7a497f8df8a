use thiserror::Error;

/// Failures surfaced by a ledger or token index backend.
#[derive(Clone, Debug, Error)]
pub enum RpcError {
    #[error("transaction {0} not found")]
    TransactionNotFound(String),

    /// The backend could not be reached or dropped the request.
    #[error("ledger transport error: {0}")]
    Transport(String),

    /// The backend answered with something that does not fit the query.
    #[error("unexpected ledger response: {0}")]
    InvalidResponse(String),

    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),

    #[error("hex parsing error: {0}")]
    Hex(#[from] faster_hex::Error),

    #[error(transparent)]
    Address(#[from] bitcann_addresses::AddressError),

    #[error(transparent)]
    Decode(#[from] bitcann_consensus_core::errors::DecodeError),

    #[error("{0}")]
    General(String),
}

impl RpcError {
    /// Whether retrying the same query later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, RpcError::Transport(_) | RpcError::TransactionNotFound(_))
    }
}

impl From<String> for RpcError {
    fn from(value: String) -> Self {
        RpcError::General(value)
    }
}

impl From<&str> for RpcError {
    fn from(value: &str) -> Self {
        RpcError::General(value.to_string())
    }
}

pub type RpcResult<T> = std::result::Result<T, crate::RpcError>;
