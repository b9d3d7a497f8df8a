use crate::tx::{LockingBytecode, TokenData, TransactionOutpoint, TransactionOutput};
use serde::{Deserialize, Serialize};

/// An unspent output together with the place it was created.
///
/// `block_height` is `None` while the creating transaction sits in the mempool.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoEntry {
    pub outpoint: TransactionOutpoint,
    pub output: TransactionOutput,
    pub block_height: Option<u64>,
}

impl UtxoEntry {
    pub fn new(outpoint: TransactionOutpoint, output: TransactionOutput, block_height: Option<u64>) -> Self {
        Self { outpoint, output, block_height }
    }

    pub fn value(&self) -> u64 {
        self.output.value
    }

    pub fn locking_bytecode(&self) -> &LockingBytecode {
        &self.output.locking_bytecode
    }

    pub fn token(&self) -> Option<&TokenData> {
        self.output.token.as_ref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.block_height.is_some()
    }
}

pub type UtxoEntries = Vec<UtxoEntry>;
