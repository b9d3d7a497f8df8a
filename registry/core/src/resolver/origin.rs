use crate::imports::*;
use crate::name::{display_name, encode_registration_id, identity_commitment};
use bitcann_rpc_core::RpcHistoryEntry;
use futures::future::try_join_all;

/// Output index of the ownership token in a claim transaction.
pub const CLAIM_OWNERSHIP_INDEX: u32 = 5;

/// Where the provenance walk of a name starts: the ownership token issued by
/// the claim transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvenanceRoot {
    pub registration_id: u64,
    pub outpoint: TransactionOutpoint,
    pub output: TransactionOutput,
    /// Effective height of the claim transaction.
    pub height: u64,
}

impl ProvenanceRoot {
    pub fn token(&self) -> Option<&TokenData> {
        self.output.token.as_ref()
    }
}

/// The canonical registration id of a name: the lowest id among the internal
/// authorization tokens held by its covenant.
pub fn canonical_registration_id(name_utxos: &ClassifiedUtxos, name: &[u8]) -> Result<u64> {
    name_utxos.internal_auths().first().map(|(_, registration_id)| *registration_id).ok_or_else(|| Error::NameNotClaimed(display_name(name)))
}

fn is_nft(output: &TransactionOutput, category: &TokenCategory, capability: Capability, commitment: &[u8]) -> bool {
    output.token.as_ref().is_some_and(|token| token.is_nft_of(category, capability) && token.commitment() == commitment)
}

/// Whether `transaction` is the claim of `name` under `registration_id`.
pub fn is_claim_transaction(
    transaction: &Transaction,
    category: &TokenCategory,
    name_locking: &LockingBytecode,
    name: &[u8],
    registration_id: u64,
) -> bool {
    let outputs = &transaction.outputs;
    transaction.inputs.len() == 4
        && (7..=8).contains(&outputs.len())
        && is_nft(&outputs[2], category, Capability::Minting, &[])
        && is_nft(&outputs[3], category, Capability::None, &encode_registration_id(registration_id))
        && outputs[3].locking_bytecode == *name_locking
        && is_nft(&outputs[4], category, Capability::None, &[])
        && outputs[4].locking_bytecode == *name_locking
        && is_nft(&outputs[5], category, Capability::None, &identity_commitment(registration_id, name))
}

/// Scans the history of the name covenant for its claim transaction.
/// Transactions are fetched concurrently.
pub async fn find_provenance_root(
    ledger: &Arc<dyn LedgerApi>,
    contracts: &RegistryContracts,
    prefix: Prefix,
    name: &[u8],
    registration_id: u64,
) -> Result<ProvenanceRoot> {
    let name_contract = contracts.name_contract(name)?;
    let name_locking = name_contract.locking_bytecode();
    let history = ledger.get_address_history(&name_contract.address(prefix)).await?;
    trace!("scanning {} transactions of the '{}' covenant for its claim", history.len(), display_name(name));

    let transactions = try_join_all(history.iter().map(|entry| ledger.get_decoded_transaction(entry.transaction_id))).await?;
    let (entry, transaction) = history
        .iter()
        .zip(transactions)
        .filter(|(_, transaction)| is_claim_transaction(transaction, &contracts.category, name_locking, name, registration_id))
        .min_by_key(|(entry, _)| entry.effective_height())
        .ok_or_else(|| Error::ClaimTransactionNotFound(display_name(name)))?;

    let RpcHistoryEntry { transaction_id, .. } = *entry;
    debug!("claim of '{}' found in {transaction_id}", display_name(name));
    Ok(ProvenanceRoot {
        registration_id,
        outpoint: TransactionOutpoint::new(transaction_id, CLAIM_OWNERSHIP_INDEX),
        output: transaction.outputs[CLAIM_OWNERSHIP_INDEX as usize].clone(),
        height: entry.effective_height(),
    })
}
