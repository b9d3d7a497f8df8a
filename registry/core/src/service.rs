//!
//! [`NameService`]: the registry facade. Fetches what each operation needs from
//! the ledger, classifies it and hands it to the builders or the resolver.
//!

use crate::contracts::ArtifactSet;
use crate::imports::*;
use crate::name::{display_name, encode_registration_id, extract_op_return_pushes, identity_commitment, is_valid_name, name_to_bytes};
use crate::pricing::{auction_price, minimum_next_bid};
use crate::records::parse_records;
use crate::resolver::{OwnershipResolver, ResolutionStrategy, ResolvedOwner, canonical_registration_id};
use crate::tx::{BuildContext, UnsignedTransaction, builders};
use futures::future::try_join_all;
use futures::try_join;

#[derive(Clone)]
pub struct NameService {
    ledger: Arc<dyn LedgerApi>,
    index: Option<Arc<dyn TokenIndexApi>>,
    config: RegistryConfig,
    contracts: Arc<RegistryContracts>,
}

impl NameService {
    pub fn new(ledger: Arc<dyn LedgerApi>, config: RegistryConfig, artifacts: ArtifactSet) -> Result<Self> {
        let contracts = Arc::new(RegistryContracts::new(artifacts, config.category, &config.params)?);
        Ok(Self { ledger, index: None, config, contracts })
    }

    /// Enables [`ResolutionStrategy::Indexed`].
    pub fn with_token_index(mut self, index: Arc<dyn TokenIndexApi>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn contracts(&self) -> &Arc<RegistryContracts> {
        &self.contracts
    }

    fn context(&self) -> BuildContext<'_> {
        BuildContext::new(&self.config.params, &self.contracts)
    }

    fn prefix(&self) -> Prefix {
        self.config.prefix()
    }

    fn resolver(&self) -> OwnershipResolver {
        OwnershipResolver::new(self.ledger.clone(), self.index.clone(), self.contracts.clone(), self.prefix(), self.config.max_resolution_hops)
    }

    async fn classified_utxos(&self, address: &Address) -> Result<ClassifiedUtxos> {
        let entries = self.ledger.get_utxos(address).await?;
        ClassifiedUtxos::classify(entries, &self.contracts.classification_context())
    }

    async fn registry_utxos(&self) -> Result<ClassifiedUtxos> {
        self.classified_utxos(&self.contracts.registry_address(self.prefix())).await
    }

    /// Registry outputs merged with the outputs at `covenant`. Every authorized
    /// call spends a token-free UTXO at the covenant's own address next to the
    /// thread NFT held by the registry.
    async fn authorized_utxos(&self, covenant: &Covenant) -> Result<ClassifiedUtxos> {
        let covenant_address = covenant.address(self.prefix());
        let (mut registry, contract) = try_join!(self.registry_utxos(), self.classified_utxos(&covenant_address))?;
        trace!("{} outputs at the registry, {} at {}", registry.len(), contract.len(), covenant.name());
        registry.extend(contract);
        Ok(registry)
    }

    async fn name_utxos(&self, name: &[u8]) -> Result<ClassifiedUtxos> {
        self.classified_utxos(&self.contracts.name_contract(name)?.address(self.prefix())).await
    }

    pub async fn create_auction(&self, name: &str, amount: u64, bidder: &Address) -> Result<UnsignedTransaction> {
        let (registry, funding) = try_join!(self.authorized_utxos(&self.contracts.auction), self.classified_utxos(bidder))?;
        builders::create_auction(&self.context(), &registry, &funding, name, amount, bidder)
    }

    pub async fn create_bid(&self, name: &str, amount: u64, bidder: &Address) -> Result<UnsignedTransaction> {
        let (registry, funding) = try_join!(self.authorized_utxos(&self.contracts.bid), self.classified_utxos(bidder))?;
        builders::bid(&self.context(), &registry, &funding, name, amount, bidder)
    }

    /// Claims `name` for its winning bidder; `creator` receives the creator incentive, if any.
    pub async fn claim_name(&self, name: &str, creator: &Address) -> Result<UnsignedTransaction> {
        let registry = self.authorized_utxos(&self.contracts.factory).await?;
        builders::claim(&self.context(), &registry, &name_to_bytes(name), creator)
    }

    pub async fn penalize_invalid_name(&self, name: &str, reward: &Address) -> Result<UnsignedTransaction> {
        let registry = self.authorized_utxos(&self.contracts.auction_name_enforcer).await?;
        builders::penalize_invalid_name(&self.context(), &registry, &name_to_bytes(name), reward)
    }

    pub async fn penalize_duplicate_auction(&self, name: &str, reward: &Address) -> Result<UnsignedTransaction> {
        let registry = self.authorized_utxos(&self.contracts.auction_conflict_resolver).await?;
        builders::penalize_duplicate_auction(&self.context(), &registry, &name_to_bytes(name), reward)
    }

    pub async fn penalize_illegal_auction(&self, name: &str, reward: &Address) -> Result<UnsignedTransaction> {
        let name_bytes = name_to_bytes(name);
        let (registry, name_utxos) = try_join!(self.authorized_utxos(&self.contracts.name_ownership_guard), self.name_utxos(&name_bytes))?;
        builders::penalize_illegal_auction(&self.context(), &registry, &name_utxos, &name_bytes, reward)
    }

    /// Publishes records for `name`. `owner` must hold the name's ownership
    /// token and funds the transaction.
    pub async fn add_records<S: AsRef<str> + Sync>(&self, name: &str, records: &[S], owner: &Address) -> Result<UnsignedTransaction> {
        let name_bytes = name_to_bytes(name);
        let (name_utxos, owner_utxos) = try_join!(self.name_utxos(&name_bytes), self.classified_utxos(owner))?;
        builders::attach_records(&self.context(), &name_utxos, &owner_utxos, &name_bytes, records, owner)
    }

    pub async fn accumulate(&self, payer: &Address) -> Result<UnsignedTransaction> {
        let (registry, funding) = try_join!(self.authorized_utxos(&self.contracts.accumulator), self.classified_utxos(payer))?;
        builders::accumulate(&self.context(), &registry, &funding, payer)
    }

    pub async fn resolve_owner(&self, name: &str, strategy: ResolutionStrategy) -> Result<ResolvedOwner> {
        self.resolver().resolve(&name_to_bytes(name), strategy).await
    }

    /// Token-aware address of the covenant holding the authorization tokens of `name`.
    pub fn get_name_address(&self, name: &str) -> Result<Address> {
        Ok(self.contracts.name_contract(&name_to_bytes(name))?.address(self.prefix()))
    }

    /// Records published for `name`, folded into a JSON object.
    ///
    /// A transaction counts as a record transaction when its first output
    /// re-emits the canonical internal authorization token at the name
    /// covenant and its second output carries the matching ownership token.
    pub async fn get_records(&self, name: &str) -> Result<serde_json::Value> {
        let name_bytes = name_to_bytes(name);
        let name_contract = self.contracts.name_contract(&name_bytes)?;
        let name_utxos = self.name_utxos(&name_bytes).await?;
        let registration_id = canonical_registration_id(&name_utxos, &name_bytes)?;

        let mut history = self.ledger.get_address_history(&name_contract.address(self.prefix())).await?;
        history.sort_by_key(|entry| entry.effective_height());
        history.dedup_by_key(|entry| entry.transaction_id);
        let transactions = try_join_all(history.iter().map(|entry| self.ledger.get_decoded_transaction(entry.transaction_id))).await?;

        let category = self.contracts.category;
        let internal_auth = TokenData::nft(category, Capability::None, encode_registration_id(registration_id).to_vec());
        let ownership = identity_commitment(registration_id, &name_bytes);
        let mut records = Vec::new();
        for transaction in transactions.iter().filter(|transaction| {
            matches!(transaction.outputs.as_slice(), [auth, owner, ..]
                if auth.locking_bytecode == *name_contract.locking_bytecode()
                    && auth.token.as_ref().is_some_and(|token| token.nft == internal_auth.nft && token.category == category)
                    && owner.token.as_ref().is_some_and(|token| token.is_nft_of(&category, Capability::None) && token.commitment() == ownership))
        }) {
            for output in &transaction.outputs {
                let Ok(pushes) = extract_op_return_pushes(&output.locking_bytecode) else {
                    continue;
                };
                for push in pushes {
                    match String::from_utf8(push) {
                        Ok(record) => records.push(record),
                        Err(_) => warn!("skipping non UTF-8 record of '{}' in {}", display_name(&name_bytes), transaction.id()),
                    }
                }
            }
        }
        debug!("found {} records for '{name}'", records.len());
        Ok(parse_records(&records))
    }

    /// Running auctions of `name`, ascending by registration id.
    pub async fn get_active_auctions(&self, name: &str) -> Result<Vec<Auction>> {
        let registry = self.registry_utxos().await?;
        Ok(registry.running_auctions(&name_to_bytes(name)).into_iter().cloned().collect())
    }

    pub async fn get_all_active_auctions(&self) -> Result<Vec<Auction>> {
        let registry = self.registry_utxos().await?;
        Ok(registry.auctions().into_iter().cloned().collect())
    }

    /// Price of the next auction, set by the id the registration counter assigns next.
    pub async fn get_auction_price(&self) -> Result<u64> {
        let registry = self.registry_utxos().await?;
        let (_, registration_id) = registry.registration_counter()?;
        Ok(auction_price(registration_id, self.config.min_starting_bid, self.config.auction_price_floor))
    }

    pub async fn get_minimum_next_bid(&self, name: &str) -> Result<u64> {
        let registry = self.registry_utxos().await?;
        let auction = registry.auction(&name_to_bytes(name))?;
        Ok(minimum_next_bid(auction.amount, self.config.min_bid_increase_percentage))
    }

    /// A name is available when it is valid, has never been claimed and has
    /// no running auction.
    pub async fn is_name_available(&self, name: &str) -> Result<bool> {
        if !is_valid_name(name) {
            return Ok(false);
        }
        let name_bytes = name_to_bytes(name);
        let (registry, name_utxos) = try_join!(self.registry_utxos(), self.name_utxos(&name_bytes))?;
        let claimed = !name_utxos.internal_auths().is_empty();
        let auctioned = !registry.running_auctions(&name_bytes).is_empty();
        trace!("'{name}': claimed {claimed}, auctioned {auctioned}");
        Ok(!claimed && !auctioned)
    }
}
