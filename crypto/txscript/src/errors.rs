use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum TxScriptError {
    #[error("invalid opcode length: {0:02x?}")]
    MalformedPushSize(Vec<u8>),
    #[error("opcode requires {0} bytes, but script only has {1} remaining")]
    MalformedPush(usize, usize),
    #[error("number {value} does not fit in {length} bytes")]
    PaddingTooShort { value: i64, length: usize },
    #[error("unsupported public key type")]
    PubKeyFormat,
    #[error("script is not a null data (OP_RETURN) script")]
    NotNullData,
    #[error("opcode {0:#04x} is not a data push")]
    NotPushOnly(u8),
    #[error(transparent)]
    Address(#[from] bitcann_addresses::AddressError),
}
