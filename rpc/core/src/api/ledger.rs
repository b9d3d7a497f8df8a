//! The client API
//!
//! Everything returned by these services is taken at face value: the registry
//! library performs no consensus validation of its own.

use crate::{RpcAddress, RpcHistoryEntry, RpcIndexedOutput, RpcResult, RpcTransactionId, RpcUtxoEntry};
use async_trait::async_trait;
use bitcann_consensus_core::tx::{TokenCategory, Transaction};
use bitcann_hashes::Hash;

/// Ledger queries, shaped after the electrum protocol.
#[async_trait]
pub trait LedgerApi: Sync + Send {
    /// Unspent outputs currently locked to `address`, mempool included.
    async fn get_utxos(&self, address: &RpcAddress) -> RpcResult<Vec<RpcUtxoEntry>>;

    /// Raw serialized transaction.
    async fn get_transaction(&self, transaction_id: RpcTransactionId) -> RpcResult<Vec<u8>>;

    /// Every transaction touching `address`, oldest first.
    async fn get_address_history(&self, address: &RpcAddress) -> RpcResult<Vec<RpcHistoryEntry>>;

    /// Confirmation height of a transaction, `<= 0` while in the mempool.
    async fn get_transaction_height(&self, transaction_id: RpcTransactionId) -> RpcResult<i64>;

    /// Every transaction touching the locking bytecode with this electrum script hash.
    async fn get_script_hash_history(&self, script_hash: Hash) -> RpcResult<Vec<RpcHistoryEntry>>;

    /// Fetches and decodes a transaction.
    async fn get_decoded_transaction(&self, transaction_id: RpcTransactionId) -> RpcResult<Transaction> {
        let bytes = self.get_transaction(transaction_id).await?;
        Ok(Transaction::from_bytes(&bytes)?)
    }
}

/// Index of every output ever created, keyed by token category and NFT commitment.
#[async_trait]
pub trait TokenIndexApi: Sync + Send {
    async fn get_token_outputs(&self, category: TokenCategory, commitment: &[u8]) -> RpcResult<Vec<RpcIndexedOutput>>;
}
