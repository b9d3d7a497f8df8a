//!
//! Covenant artifacts and their instantiation for a registry deployment.
//!

pub mod artifact;
pub mod covenant;

pub use artifact::{AbiFunction, AbiInput, ArtifactSet, CovenantArtifact};
pub use covenant::{Argument, Covenant, Unlock};

use crate::imports::*;
use crate::utxo::ClassificationContext;

/// Every covenant of a registry deployment, instantiated with the deployment's
/// category and parameters. The per-name covenant depends on the name and is
/// derived on demand by [`RegistryContracts::name_contract`].
#[derive(Clone, Debug)]
pub struct RegistryContracts {
    pub category: TokenCategory,
    pub registry: Covenant,
    pub auction: Covenant,
    pub bid: Covenant,
    pub factory: Covenant,
    pub auction_name_enforcer: Covenant,
    pub auction_conflict_resolver: Covenant,
    pub name_ownership_guard: Covenant,
    pub accumulator: Covenant,
    name_artifact: Arc<CovenantArtifact>,
}

impl RegistryContracts {
    pub fn new(artifacts: ArtifactSet, category: TokenCategory, params: &Params) -> Result<Self> {
        params.validate()?;
        let name_artifact = Arc::new(artifacts.name);
        let name_bytecode = Argument::Bytes(name_artifact.bytecode_bytes()?);
        let category_bytes = Argument::Bytes(category.as_bytes().to_vec());
        let instantiate = |artifact: CovenantArtifact, arguments: Vec<Argument>| Covenant::new(Arc::new(artifact), arguments);

        Ok(Self {
            category,
            registry: instantiate(artifacts.registry, vec![category_bytes])?,
            auction: instantiate(artifacts.auction, vec![Argument::Int(params.min_starting_bid as i64)])?,
            bid: instantiate(artifacts.bid, vec![Argument::Int(params.min_bid_increase_percentage as i64)])?,
            factory: instantiate(artifacts.factory, vec![name_bytecode.clone(), Argument::Int(params.min_wait_time as i64)])?,
            auction_name_enforcer: instantiate(artifacts.auction_name_enforcer, vec![])?,
            auction_conflict_resolver: instantiate(artifacts.auction_conflict_resolver, vec![])?,
            name_ownership_guard: instantiate(artifacts.name_ownership_guard, vec![name_bytecode])?,
            accumulator: instantiate(artifacts.accumulator, vec![])?,
            name_artifact,
        })
    }

    /// The covenant holding the authorization tokens of `name`.
    pub fn name_contract(&self, name: &[u8]) -> Result<Covenant> {
        Covenant::new(self.name_artifact.clone(), vec![Argument::Bytes(name.to_vec()), Argument::Bytes(self.category.as_bytes().to_vec())])
    }

    pub fn registry_address(&self, prefix: Prefix) -> Address {
        self.registry.address(prefix)
    }

    /// Covenants a registry thread NFT can authorize.
    pub fn authorized_contracts(&self) -> [&Covenant; 7] {
        [
            &self.auction,
            &self.bid,
            &self.factory,
            &self.auction_name_enforcer,
            &self.auction_conflict_resolver,
            &self.name_ownership_guard,
            &self.accumulator,
        ]
    }

    pub fn classification_context(&self) -> ClassificationContext {
        ClassificationContext::new(
            self.category,
            self.authorized_contracts().iter().map(|covenant| (covenant.locking_bytecode().clone(), covenant.name().to_string())),
        )
    }
}
