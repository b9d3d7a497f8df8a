use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    #[error("{0} trailing bytes after transaction")]
    TrailingBytes(usize),

    #[error("non-minimal compact size encoding of {0}")]
    NonMinimalCompactSize(u64),

    #[error("length {0} does not fit in memory")]
    LengthOverflow(u64),

    #[error("token prefix uses reserved bit in bitfield {0:#04x}")]
    ReservedTokenBit(u8),

    #[error("invalid NFT capability {0}")]
    InvalidCapability(u8),

    #[error("token prefix encodes a capability or commitment without an NFT")]
    CommitmentWithoutNft,

    #[error("token prefix declares an empty commitment")]
    EmptyCommitment,

    #[error("token commitment of {0} bytes exceeds the maximum")]
    CommitmentTooLong(usize),

    #[error("token prefix carries neither an NFT nor a fungible amount")]
    EmptyToken,

    #[error("invalid fungible token amount {0}")]
    InvalidTokenAmount(u64),
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
