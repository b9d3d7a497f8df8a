use super::{OwnershipTip, ProvenanceRoot};
use crate::imports::*;
use crate::name::display_name;
use bitcann_rpc_core::RpcIndexedOutput;
use bitcann_txscript::extract_script_pub_key_address;
use futures::future::try_join_all;

/// Whether `candidate` is still unspent according to the ledger itself.
async fn is_live(ledger: &Arc<dyn LedgerApi>, candidate: &RpcIndexedOutput, prefix: Prefix) -> Result<bool> {
    let Ok(address) = extract_script_pub_key_address(&candidate.locking_bytecode, prefix) else {
        warn!("ownership candidate {} has a non-standard locking bytecode", candidate.outpoint());
        return Ok(false);
    };
    let utxos = ledger.get_utxos(&address).await?;
    Ok(utxos.iter().any(|utxo| utxo.outpoint == candidate.outpoint()))
}

/// Looks the ownership token up in the token index: every output ever created
/// with the identity commitment, of which exactly one must be current.
///
/// An output counts as spent when the index links a spender or when the token
/// was re-created at a later height; mempool outputs rank above every block.
/// When that still leaves several candidates, or none while unconfirmed
/// outputs exist, the unconfirmed candidates are checked against the live
/// UTXOs of their holders.
pub async fn lookup(
    ledger: &Arc<dyn LedgerApi>,
    index: Option<&Arc<dyn TokenIndexApi>>,
    root: &ProvenanceRoot,
    name: &[u8],
    prefix: Prefix,
) -> Result<OwnershipTip> {
    let index = index.ok_or(Error::IndexUnavailable)?;
    let token = root.token().ok_or(Error::MalformedToken(root.outpoint))?;
    let outputs: Vec<_> =
        index.get_token_outputs(token.category, token.commitment()).await?.into_iter().filter(|output| output.amount == token.amount).collect();
    trace!("token index holds {} outputs for '{}'", outputs.len(), display_name(name));
    if !outputs.iter().any(|output| output.outpoint() == root.outpoint) {
        warn!("token index does not know the claim output {} of '{}'", root.outpoint, display_name(name));
        return Err(Error::IndexUnavailable);
    }

    let mut unspent: Vec<_> = outputs.iter().filter(|output| !output.is_spent()).collect();
    if let Some(latest) = unspent.iter().map(|output| output.effective_height()).max() {
        unspent.retain(|output| output.effective_height() == latest);
    }
    if unspent.is_empty() {
        unspent = outputs.iter().filter(|output| output.block_height.is_none()).collect();
        trace!("no unspent output of '{}' in the index, {} unconfirmed candidates", display_name(name), unspent.len());
    }
    if unspent.len() > 1 || unspent.iter().any(|output| output.is_spent()) {
        let live = try_join_all(unspent.iter().map(|candidate| is_live(ledger, candidate, prefix))).await?;
        unspent = unspent.into_iter().zip(live).filter_map(|(candidate, live)| live.then_some(candidate)).collect();
    }
    let tip = match unspent.as_slice() {
        [tip] => *tip,
        [] => {
            let burned_by = outputs.iter().filter_map(|output| output.spent_by).last().unwrap_or(root.outpoint.transaction_id);
            return Err(Error::OwnershipTokenBurned(burned_by.to_string()));
        }
        _ => return Err(Error::AmbiguousOwnership(display_name(name))),
    };

    let transaction = ledger.get_decoded_transaction(tip.transaction_id).await?;
    let output = transaction
        .outputs
        .get(tip.index as usize)
        .filter(|output| output.token.as_ref() == Some(token))
        .cloned()
        .ok_or(Error::MalformedToken(tip.outpoint()))?;
    debug!("ownership token of '{}' found at {} by index lookup", display_name(name), tip.outpoint());
    Ok(OwnershipTip { outpoint: tip.outpoint(), output, hops: outputs.len() - 1 })
}
