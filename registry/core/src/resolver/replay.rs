use super::{OwnershipTip, ProvenanceRoot};
use crate::imports::*;
use bitcann_hashes::script_hash;
use bitcann_rpc_core::RpcHistoryEntry;
use futures::future::try_join_all;

/// Position of the ownership token during a replay.
#[derive(Clone, Debug)]
struct ReplayState {
    outpoint: TransactionOutpoint,
    output: TransactionOutput,
    /// Effective height of the transaction that created `outpoint`; its spender
    /// cannot be older.
    lower_bound: u64,
}

impl ReplayState {
    fn holder(&self) -> &LockingBytecode {
        &self.output.locking_bytecode
    }
}

/// The transaction spending the state's outpoint, searched in the history of
/// the holder's locking bytecode.
async fn find_spender(ledger: &Arc<dyn LedgerApi>, state: &ReplayState) -> Result<Option<(RpcHistoryEntry, Transaction)>> {
    let mut history = ledger.get_script_hash_history(script_hash(state.holder().script())).await?;
    history.retain(|entry| entry.effective_height() >= state.lower_bound && entry.transaction_id != state.outpoint.transaction_id);
    history.sort_by_key(RpcHistoryEntry::effective_height);
    trace!("scanning {} transactions of holder {} for a spend of {}", history.len(), state.holder(), state.outpoint);

    let transactions = try_join_all(history.iter().map(|entry| ledger.get_decoded_transaction(entry.transaction_id))).await?;
    Ok(history.into_iter().zip(transactions).find(|(_, transaction)| transaction.spends(&state.outpoint)))
}

/// Follows the ownership token from the claim through every transfer, one
/// history scan per hop, until it reaches an unspent output.
pub async fn replay(ledger: &Arc<dyn LedgerApi>, root: &ProvenanceRoot, max_hops: usize) -> Result<OwnershipTip> {
    let token = root.token().cloned().ok_or(Error::MalformedToken(root.outpoint))?;
    let mut state = ReplayState { outpoint: root.outpoint, output: root.output.clone(), lower_bound: root.height };
    let mut hops = 0;

    while let Some((entry, transaction)) = find_spender(ledger, &state).await? {
        if hops == max_hops {
            return Err(Error::ResolutionStepLimit(max_hops));
        }
        let (index, output) = transaction
            .outputs
            .iter()
            .enumerate()
            .find(|(_, output)| output.token.as_ref() == Some(&token))
            .ok_or_else(|| Error::OwnershipTokenBurned(entry.transaction_id.to_string()))?;
        hops += 1;
        debug!("hop {hops}: ownership token moved from {} to ({}, {index})", state.outpoint, entry.transaction_id);
        state = ReplayState {
            outpoint: TransactionOutpoint::new(entry.transaction_id, index as u32),
            output: output.clone(),
            lower_bound: entry.effective_height(),
        };
    }

    Ok(OwnershipTip { outpoint: state.outpoint, output: state.output, hops })
}
