use crate::RpcTransactionId;
use bitcann_consensus_core::tx::{LockingBytecode, TransactionOutpoint};
use serde::{Deserialize, Serialize};

/// An output returned by the token index. `block_height` is `None` for
/// outputs created by mempool transactions; `spent_by` is set once the index
/// has seen a transaction consuming it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcIndexedOutput {
    pub transaction_id: RpcTransactionId,
    pub index: u32,
    pub locking_bytecode: LockingBytecode,
    pub amount: u64,
    pub block_height: Option<u64>,
    pub spent_by: Option<RpcTransactionId>,
}

impl RpcIndexedOutput {
    pub fn outpoint(&self) -> TransactionOutpoint {
        TransactionOutpoint::new(self.transaction_id, self.index)
    }

    pub fn is_spent(&self) -> bool {
        self.spent_by.is_some()
    }

    /// Creation height with mempool outputs ordered after every block.
    pub fn effective_height(&self) -> u64 {
        self.block_height.unwrap_or(u64::MAX)
    }
}
