use bitcann_addresses::AddressError;
use bitcann_consensus_core::errors::DecodeError;
use bitcann_consensus_core::tx::{TokenCategory, TransactionOutpoint};
use bitcann_hashes::HashError;
use bitcann_rpc_core::RpcError;
use bitcann_txscript::{TxScriptError, script_builder::ScriptBuilderError};
use thiserror::Error;

use crate::records::RecordsError;

/// Broad classes of [`Error`], for callers that decide on retry or
/// reporting without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A structural role required by the operation is absent from the fetched outputs.
    NotFound,
    /// The request does not satisfy the preconditions the covenants enforce.
    InvalidInput,
    /// Ledger history does not allow a definite answer.
    ResolutionFailure,
    /// Ledger access, decoding, configuration or an internal consistency check failed.
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    #[error("no thread NFT authorizing the {0} contract found in the registry")]
    ThreadNotFound(String),

    #[error("registration counter not found in the registry")]
    RegistrationCounterNotFound,

    #[error("claim minting token not found in the registry")]
    ClaimMintingNotFound,

    #[error("no running auction found for name '{0}'")]
    AuctionNotFound(String),

    #[error("no funding output of at least {0} satoshis found")]
    FundingNotFound(u64),

    #[error("no ownership token found for name '{0}'")]
    OwnershipNotFound(String),

    #[error("no internal authorization token found for name '{0}'")]
    InternalAuthNotFound(String),

    #[error("no external authorization token found for name '{0}'")]
    ExternalAuthNotFound(String),

    #[error("no spendable output found at the {0} contract")]
    AuthorizedContractNotFound(String),

    #[error("no thread NFT holding fungible tokens found in the registry")]
    TokenThreadNotFound,

    #[error("name must not be empty")]
    EmptyName,

    #[error("name '{name}' has an invalid character at byte {index}")]
    InvalidName { name: String, index: usize },

    #[error("name of {0} bytes exceeds the maximum name length")]
    NameTooLong(usize),

    #[error("bid of {amount} satoshis is below the minimum of {required}")]
    BidTooLow { amount: u64, required: u64 },

    #[error("auction amount of {amount} satoshis is below the auction price of {required}")]
    AuctionAmountTooLow { amount: u64, required: u64 },

    #[error("name '{0}' has no invalid character")]
    NameIsValid(String),

    #[error("name '{0}' has no duplicate auction")]
    NoDuplicateAuction(String),

    #[error("insufficient funds: {required} satoshis required, {available} available")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("registration counter holds {available} fungible tokens, {required} required")]
    InsufficientCounterTokens { available: u64, required: u64 },

    #[error("address {0} is not a pay-to-public-key-hash address")]
    UnsupportedAddress(String),

    #[error("contract {contract} expects {expected} arguments, {actual} given")]
    ArtifactArguments { contract: String, expected: usize, actual: usize },

    #[error("contract {contract} has no function '{function}'")]
    UnknownFunction { contract: String, function: String },

    #[error("contract {0} has invalid bytecode")]
    InvalidBytecode(String),

    #[error(transparent)]
    Records(#[from] RecordsError),

    #[error("name '{0}' has not been claimed")]
    NameNotClaimed(String),

    #[error("claim transaction for name '{0}' not found")]
    ClaimTransactionNotFound(String),

    #[error("ownership of name '{0}' is ambiguous")]
    AmbiguousOwnership(String),

    #[error("malformed commitment: {0}")]
    MalformedCommitment(String),

    #[error("registry token at {0} matches no known role")]
    MalformedToken(TransactionOutpoint),

    #[error("ownership token spent by {0} without being re-emitted")]
    OwnershipTokenBurned(String),

    #[error("ownership resolution exceeded {0} hops")]
    ResolutionStepLimit(usize),

    #[error("token index is not available")]
    IndexUnavailable,

    #[error("token category {category} not conserved: {inputs} in, {outputs} out")]
    TokenConservation { category: TokenCategory, inputs: u64, outputs: u64 },

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Script(#[from] TxScriptError),

    #[error(transparent)]
    ScriptBuilder(#[from] ScriptBuilderError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("invalid registry parameters: {0}")]
    InvalidParams(String),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Hex(#[from] faster_hex::Error),
}

impl Error {
    pub fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            ThreadNotFound(_)
            | RegistrationCounterNotFound
            | ClaimMintingNotFound
            | AuctionNotFound(_)
            | FundingNotFound(_)
            | OwnershipNotFound(_)
            | InternalAuthNotFound(_)
            | ExternalAuthNotFound(_)
            | AuthorizedContractNotFound(_)
            | TokenThreadNotFound => ErrorKind::NotFound,

            EmptyName
            | InvalidName { .. }
            | NameTooLong(_)
            | BidTooLow { .. }
            | AuctionAmountTooLow { .. }
            | NameIsValid(_)
            | NoDuplicateAuction(_)
            | InsufficientFunds { .. }
            | InsufficientCounterTokens { .. }
            | UnsupportedAddress(_)
            | Records(_) => ErrorKind::InvalidInput,

            NameNotClaimed(_)
            | ClaimTransactionNotFound(_)
            | AmbiguousOwnership(_)
            | MalformedCommitment(_)
            | MalformedToken(_)
            | OwnershipTokenBurned(_)
            | ResolutionStepLimit(_)
            | IndexUnavailable => ErrorKind::ResolutionFailure,

            Custom(_)
            | ArtifactArguments { .. }
            | UnknownFunction { .. }
            | InvalidBytecode(_)
            | TokenConservation { .. }
            | Rpc(_)
            | Address(_)
            | Decode(_)
            | Script(_)
            | ScriptBuilder(_)
            | Hash(_)
            | InvalidParams(_)
            | Config(_)
            | SerdeJson(_)
            | Hex(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Custom(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Custom(value.to_string())
    }
}
