//!
//! Ownership resolution. The owner of a name is whoever holds the identity
//! token issued by the name's claim transaction; the resolver locates that
//! claim and follows the token to its current, unspent output.
//!

pub mod indexed;
pub mod origin;
pub mod replay;

pub use origin::{CLAIM_OWNERSHIP_INDEX, ProvenanceRoot, canonical_registration_id, find_provenance_root, is_claim_transaction};

use crate::imports::*;
use bitcann_txscript::extract_script_pub_key_address;

/// How the identity token is followed from the claim to its current holder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStrategy {
    /// Replays the token's transfers one history scan at a time. Needs
    /// nothing beyond the ledger.
    #[default]
    LinearReplay,
    /// Asks the token index for every output carrying the identity token.
    Indexed,
}

/// The unspent output holding an identity token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipTip {
    pub outpoint: TransactionOutpoint,
    pub output: TransactionOutput,
    /// Transfers since the claim.
    pub hops: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOwner {
    /// Token-aware address of the holder, `None` for non-standard locking bytecode.
    pub address: Option<Address>,
    pub locking_bytecode: LockingBytecode,
    pub outpoint: TransactionOutpoint,
    pub registration_id: u64,
    pub hops: usize,
}

#[derive(Clone)]
pub struct OwnershipResolver {
    ledger: Arc<dyn LedgerApi>,
    index: Option<Arc<dyn TokenIndexApi>>,
    contracts: Arc<RegistryContracts>,
    prefix: Prefix,
    max_hops: usize,
}

impl OwnershipResolver {
    pub fn new(
        ledger: Arc<dyn LedgerApi>,
        index: Option<Arc<dyn TokenIndexApi>>,
        contracts: Arc<RegistryContracts>,
        prefix: Prefix,
        max_hops: usize,
    ) -> Self {
        Self { ledger, index, contracts, prefix, max_hops }
    }

    /// Canonical registration id of `name`, read from the UTXOs of its covenant.
    pub async fn registration_id(&self, name: &[u8]) -> Result<u64> {
        let name_contract = self.contracts.name_contract(name)?;
        let entries = self.ledger.get_utxos(&name_contract.address(self.prefix)).await?;
        let name_utxos = ClassifiedUtxos::classify(entries, &self.contracts.classification_context())?;
        canonical_registration_id(&name_utxos, name)
    }

    pub async fn provenance_root(&self, name: &[u8]) -> Result<ProvenanceRoot> {
        let registration_id = self.registration_id(name).await?;
        find_provenance_root(&self.ledger, &self.contracts, self.prefix, name, registration_id).await
    }

    pub async fn resolve(&self, name: &[u8], strategy: ResolutionStrategy) -> Result<ResolvedOwner> {
        let root = self.provenance_root(name).await?;
        let tip = match strategy {
            ResolutionStrategy::LinearReplay => replay::replay(&self.ledger, &root, self.max_hops).await?,
            ResolutionStrategy::Indexed => indexed::lookup(&self.ledger, self.index.as_ref(), &root, name, self.prefix).await?,
        };
        let locking_bytecode = tip.output.locking_bytecode;
        let address = extract_script_pub_key_address(&locking_bytecode, self.prefix).ok().map(|address| address.to_token_aware());
        Ok(ResolvedOwner { address, locking_bytecode, outpoint: tip.outpoint, registration_id: root.registration_id, hops: tip.hops })
    }
}
