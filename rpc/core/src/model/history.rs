use crate::RpcTransactionId;
use serde::{Deserialize, Serialize};

/// One transaction of an address or script hash history.
///
/// Electrum reports `0` for mempool transactions and `-1` for mempool
/// transactions with unconfirmed parents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcHistoryEntry {
    #[serde(rename = "tx_hash")]
    pub transaction_id: RpcTransactionId,
    pub height: i64,
}

impl RpcHistoryEntry {
    pub fn new(transaction_id: RpcTransactionId, height: i64) -> Self {
        Self { transaction_id, height }
    }

    pub fn is_confirmed(&self) -> bool {
        self.height > 0
    }

    /// Height used for ordering, mempool entries sort after every block.
    pub fn effective_height(&self) -> u64 {
        if self.is_confirmed() { self.height as u64 } else { u64::MAX }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcann_hashes::Hash;

    #[test]
    fn test_history_entry_serde() {
        let entry = RpcHistoryEntry::new(Hash::from_bytes([1; 32]), 840_000);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, format!("{{\"tx_hash\":\"{}\",\"height\":840000}}", entry.transaction_id));
        let back: RpcHistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_effective_height() {
        assert_eq!(RpcHistoryEntry::new(Hash::default(), 10).effective_height(), 10);
        assert_eq!(RpcHistoryEntry::new(Hash::default(), 0).effective_height(), u64::MAX);
        assert_eq!(RpcHistoryEntry::new(Hash::default(), -1).effective_height(), u64::MAX);
        assert!(!RpcHistoryEntry::new(Hash::default(), -1).is_confirmed());
    }
}
