//!
//! In-memory ledger and token index. Transactions are applied without any
//! validation; histories, UTXOs and the token index are derived from them the
//! way an electrum server and an indexer would.
//!

use crate::imports::*;
use bitcann_hashes::script_hash;
use bitcann_rpc_core::{RpcAddress, RpcError, RpcHistoryEntry, RpcIndexedOutput, RpcResult, RpcTransactionId, RpcUtxoEntry};
use bitcann_txscript::{is_unspendable, pay_to_address_script};
use std::sync::Mutex;

#[derive(Default)]
struct LedgerState {
    transactions: HashMap<TransactionId, (Vec<u8>, i64)>,
    utxos: BTreeMap<TransactionOutpoint, UtxoEntry>,
    histories: HashMap<Hash, Vec<RpcHistoryEntry>>,
    index: Vec<(TokenData, RpcIndexedOutput)>,
}

impl LedgerState {
    fn record_history(&mut self, locking_bytecode: &LockingBytecode, transaction_id: TransactionId, height: i64) {
        let history = self.histories.entry(script_hash(locking_bytecode.script())).or_default();
        if !history.iter().any(|entry| entry.transaction_id == transaction_id) {
            history.push(RpcHistoryEntry::new(transaction_id, height));
        }
    }

    fn index_output(&mut self, outpoint: TransactionOutpoint, output: &TransactionOutput, block_height: Option<u64>) {
        if let Some(token) = output.token.as_ref().filter(|token| token.has_nft()) {
            self.index.push((token.clone(), RpcIndexedOutput {
                transaction_id: outpoint.transaction_id,
                index: outpoint.index,
                locking_bytecode: output.locking_bytecode.clone(),
                amount: token.amount,
                block_height,
                spent_by: None,
            }));
        }
    }
}

#[derive(Default)]
pub struct LedgerMock {
    state: Mutex<LedgerState>,
}

impl LedgerMock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds outputs that exist without a known creating transaction.
    pub fn fund(&self, entries: impl IntoIterator<Item = UtxoEntry>) {
        let mut state = self.state.lock().unwrap();
        for entry in entries {
            state.index_output(entry.outpoint, &entry.output, entry.block_height);
            state.utxos.insert(entry.outpoint, entry);
        }
    }

    /// Applies `transaction` at `height` (`0` for the mempool) and returns its id.
    pub fn apply(&self, transaction: &Transaction, height: i64) -> TransactionId {
        let transaction_id = transaction.id();
        let block_height = (height > 0).then_some(height as u64);
        let mut state = self.state.lock().unwrap();

        for input in &transaction.inputs {
            if let Some(spent) = state.utxos.remove(&input.previous_outpoint) {
                state.record_history(spent.locking_bytecode(), transaction_id, height);
            }
            for (_, indexed) in state.index.iter_mut().filter(|(_, indexed)| indexed.outpoint() == input.previous_outpoint) {
                indexed.spent_by = Some(transaction_id);
            }
        }
        for (index, output) in transaction.outputs.iter().enumerate() {
            let outpoint = TransactionOutpoint::new(transaction_id, index as u32);
            if is_unspendable(output.locking_bytecode.script()) {
                continue;
            }
            state.record_history(&output.locking_bytecode, transaction_id, height);
            state.index_output(outpoint, output, block_height);
            state.utxos.insert(outpoint, UtxoEntry::new(outpoint, output.clone(), block_height));
        }
        state.transactions.insert(transaction_id, (transaction.to_bytes(), height));
        transaction_id
    }

    /// Makes the token index forget it saw `outpoint` being spent, as an
    /// index lagging behind the mempool would.
    pub fn forget_index_spend(&self, outpoint: &TransactionOutpoint) {
        let mut state = self.state.lock().unwrap();
        for (_, indexed) in state.index.iter_mut().filter(|(_, indexed)| indexed.outpoint() == *outpoint) {
            indexed.spent_by = None;
        }
    }

    pub fn utxo(&self, outpoint: &TransactionOutpoint) -> Option<UtxoEntry> {
        self.state.lock().unwrap().utxos.get(outpoint).cloned()
    }
}

#[async_trait::async_trait]
impl LedgerApi for LedgerMock {
    async fn get_utxos(&self, address: &RpcAddress) -> RpcResult<Vec<RpcUtxoEntry>> {
        let locking_bytecode = pay_to_address_script(address);
        let state = self.state.lock().unwrap();
        Ok(state.utxos.values().filter(|entry| *entry.locking_bytecode() == locking_bytecode).cloned().collect())
    }

    async fn get_transaction(&self, transaction_id: RpcTransactionId) -> RpcResult<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state.transactions.get(&transaction_id).map(|(bytes, _)| bytes.clone()).ok_or_else(|| RpcError::TransactionNotFound(transaction_id.to_string()))
    }

    async fn get_address_history(&self, address: &RpcAddress) -> RpcResult<Vec<RpcHistoryEntry>> {
        self.get_script_hash_history(script_hash(pay_to_address_script(address).script())).await
    }

    async fn get_transaction_height(&self, transaction_id: RpcTransactionId) -> RpcResult<i64> {
        let state = self.state.lock().unwrap();
        state.transactions.get(&transaction_id).map(|(_, height)| *height).ok_or_else(|| RpcError::TransactionNotFound(transaction_id.to_string()))
    }

    async fn get_script_hash_history(&self, script_hash: Hash) -> RpcResult<Vec<RpcHistoryEntry>> {
        Ok(self.state.lock().unwrap().histories.get(&script_hash).cloned().unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl TokenIndexApi for LedgerMock {
    async fn get_token_outputs(&self, category: TokenCategory, commitment: &[u8]) -> RpcResult<Vec<RpcIndexedOutput>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .index
            .iter()
            .filter(|(token, _)| token.category == category && token.commitment() == commitment)
            .map(|(_, indexed)| indexed.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::*;

    #[tokio::test]
    async fn test_ledger_mock() {
        let ledger = LedgerMock::new();
        let alice = test_address(1);
        ledger.fund([p2pkh_entry(1, [1; 20], 10_000)]);
        assert_eq!(ledger.get_utxos(&alice).await.unwrap().len(), 1);

        let transaction = Transaction::new_standard(
            vec![bitcann_consensus_core::tx::TransactionInput::final_sequence(outpoint(1), vec![])],
            vec![TransactionOutput::new(9_000, p2pkh_locking([2; 20]))],
        );
        let transaction_id = ledger.apply(&transaction, 0);
        assert!(ledger.get_utxos(&alice).await.unwrap().is_empty());
        assert_eq!(ledger.get_utxos(&test_address(2)).await.unwrap()[0].outpoint, TransactionOutpoint::new(transaction_id, 0));
        assert_eq!(ledger.get_address_history(&alice).await.unwrap(), vec![RpcHistoryEntry::new(transaction_id, 0)]);
        assert_eq!(ledger.get_transaction_height(transaction_id).await.unwrap(), 0);
        assert_eq!(ledger.get_decoded_transaction(transaction_id).await.unwrap(), transaction);
        assert!(matches!(ledger.get_transaction(Hash::default()).await, Err(RpcError::TransactionNotFound(_))));
    }
}
