/// Transaction version emitted by every builder. Version 2 enables BIP68 relative lock-times.
pub const TX_VERSION: u32 = 2;

pub const LOCK_TIME: u32 = 0;

/// Sequence number that disables relative lock-time for an input.
pub const SEQUENCE_FINAL: u32 = u32::MAX;

/// Minimum value of a plain P2PKH output considered standard.
pub const DUST_THRESHOLD: u64 = 546;

/// Value every token-carrying output is created with.
pub const TOKEN_OUTPUT_DUST: u64 = 1_000;

/// Largest NFT commitment accepted by consensus.
pub const MAX_COMMITMENT_LENGTH: usize = 128;

/// Largest fungible token amount of a single output.
pub const MAX_TOKEN_AMOUNT: u64 = i64::MAX as u64;
