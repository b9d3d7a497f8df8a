mod locking_bytecode;
mod token;

pub use locking_bytecode::*;
pub use token::*;

use crate::{
    constants::{LOCK_TIME, SEQUENCE_FINAL, TX_VERSION},
    errors::DecodeResult,
    hashing,
    mass::transaction_serialized_size,
    wire,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Represents the ID of a Bitcoin Cash transaction
pub type TransactionId = bitcann_hashes::Hash;

/// Index of an output within its transaction.
pub type TransactionIndexType = u32;

/// Represents a transaction outpoint
#[derive(Eq, Hash, PartialEq, Debug, Copy, Clone, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutpoint {
    pub transaction_id: TransactionId,
    pub index: TransactionIndexType,
}

impl TransactionOutpoint {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }
}

impl Display for TransactionOutpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.transaction_id, self.index)
    }
}

/// Represents a transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub previous_outpoint: TransactionOutpoint,
    #[serde(with = "crate::serde_bytes")]
    pub unlocking_bytecode: Vec<u8>,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn new(previous_outpoint: TransactionOutpoint, unlocking_bytecode: Vec<u8>, sequence: u32) -> Self {
        Self { previous_outpoint, unlocking_bytecode, sequence }
    }

    /// An input without relative lock-time.
    pub fn final_sequence(previous_outpoint: TransactionOutpoint, unlocking_bytecode: Vec<u8>) -> Self {
        Self::new(previous_outpoint, unlocking_bytecode, SEQUENCE_FINAL)
    }
}

/// Represents a transaction output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutput {
    pub value: u64,
    pub locking_bytecode: LockingBytecode,
    pub token: Option<TokenData>,
}

impl TransactionOutput {
    pub fn new(value: u64, locking_bytecode: LockingBytecode) -> Self {
        Self { value, locking_bytecode, token: None }
    }

    pub fn with_token(value: u64, locking_bytecode: LockingBytecode, token: TokenData) -> Self {
        Self { value, locking_bytecode, token: Some(token) }
    }

    /// Fungible amount of `category` held by this output.
    pub fn token_amount(&self, category: &TokenCategory) -> u64 {
        match &self.token {
            Some(token) if token.category == *category => token.amount,
            _ => 0,
        }
    }

    pub fn category(&self) -> Option<&TokenCategory> {
        self.token.as_ref().map(|token| &token.category)
    }
}

/// Represents a Bitcoin Cash transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

impl Transaction {
    pub fn new(version: u32, inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>, lock_time: u32) -> Self {
        Self { version, inputs, outputs, lock_time }
    }

    /// A transaction with the version and lock time used by every registry operation.
    pub fn new_standard(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Self::new(TX_VERSION, inputs, outputs, LOCK_TIME)
    }

    /// Hash256 of the serialized transaction, in wire byte order.
    pub fn id(&self) -> TransactionId {
        hashing::tx::id(self)
    }

    pub fn serialized_size(&self) -> u64 {
        transaction_serialized_size(self)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        hashing::tx::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        wire::deserialize_transaction(bytes)
    }

    pub fn outpoint(&self, index: u32) -> TransactionOutpoint {
        TransactionOutpoint::new(self.id(), index)
    }

    /// Spends `outpoint`, if any input does.
    pub fn spends(&self, outpoint: &TransactionOutpoint) -> bool {
        self.inputs.iter().any(|input| input.previous_outpoint == *outpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outpoint_ordering() {
        let a = TransactionOutpoint::new(TransactionId::from_bytes([1; 32]), 5);
        let b = TransactionOutpoint::new(TransactionId::from_bytes([1; 32]), 6);
        let c = TransactionOutpoint::new(TransactionId::from_bytes([2; 32]), 0);
        let mut outpoints = vec![c, b, a];
        outpoints.sort();
        assert_eq!(outpoints, vec![a, b, c]);
    }

    #[test]
    fn test_token_amount() {
        let category = TokenCategory::from_bytes([3; 32]);
        let other = TokenCategory::from_bytes([4; 32]);
        let output = TransactionOutput::with_token(1000, LockingBytecode::default(), TokenData::fungible(category, 42));
        assert_eq!(output.token_amount(&category), 42);
        assert_eq!(output.token_amount(&other), 0);
        assert_eq!(TransactionOutput::new(1000, LockingBytecode::default()).token_amount(&category), 0);
    }

    #[test]
    fn test_transaction_serde_json() {
        let category = TokenCategory::from_bytes([5; 32]);
        let tx = Transaction::new_standard(
            vec![TransactionInput::final_sequence(TransactionOutpoint::new(TransactionId::from_bytes([6; 32]), 1), vec![0x51])],
            vec![TransactionOutput::with_token(
                1000,
                LockingBytecode::from_vec(vec![0x6a]),
                TokenData::nft(category, Capability::Minting, vec![0, 1]),
            )],
        );
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("\"unlockingBytecode\":\"51\""));
        assert!(json.contains("\"capability\":\"minting\""));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }
}
