use crate::imports::*;
use crate::name::{REGISTRATION_ID_SIZE, decode_registration_id, display_name, split_auction_commitment, split_identity_commitment};
use bitcann_hashes::HASH160_SIZE;
use bitcann_txscript::script_class::ScriptClass;

/// What the classifier needs to know about a deployment: its token category
/// and the covenants thread NFTs may authorize, keyed by locking bytecode.
#[derive(Clone, Debug, Default)]
pub struct ClassificationContext {
    pub category: TokenCategory,
    pub authorized_contracts: HashMap<LockingBytecode, String>,
}

impl ClassificationContext {
    pub fn new(category: TokenCategory, authorized_contracts: impl IntoIterator<Item = (LockingBytecode, String)>) -> Self {
        Self { category, authorized_contracts: authorized_contracts.into_iter().collect() }
    }

    fn classify(&self, entry: &UtxoEntry) -> Result<UtxoRole> {
        let Some(token) = entry.token() else {
            return Ok(match ScriptClass::from_script(entry.locking_bytecode().script()) {
                ScriptClass::PubKeyHash => UtxoRole::Funding,
                _ => UtxoRole::Foreign,
            });
        };
        if token.category != self.category {
            trace!("skipping output {} of foreign category {}", entry.outpoint, token.category);
            return Ok(UtxoRole::Foreign);
        }

        let commitment = token.commitment();
        let role = match token.capability() {
            Some(Capability::None) => {
                let authorized = LockingBytecode::from_slice(commitment);
                if self.authorized_contracts.contains_key(&authorized) {
                    UtxoRole::Thread { authorized }
                } else if commitment.is_empty() {
                    UtxoRole::ExternalAuth
                } else if commitment.len() == REGISTRATION_ID_SIZE {
                    UtxoRole::InternalAuth { registration_id: decode_registration_id(commitment)? }
                } else {
                    let (registration_id, name) = split_identity_commitment(commitment)?;
                    UtxoRole::Ownership { registration_id, name: name.to_vec() }
                }
            }
            Some(Capability::Minting) if commitment.is_empty() => UtxoRole::ClaimMinting,
            Some(Capability::Minting) if commitment.len() == REGISTRATION_ID_SIZE => {
                UtxoRole::RegistrationCounter { next_registration_id: decode_registration_id(commitment)? }
            }
            Some(Capability::Mutable) if commitment.len() > HASH160_SIZE => {
                let (bidder, name) = split_auction_commitment(commitment)?;
                UtxoRole::Auction(Auction {
                    name: name.to_vec(),
                    bidder,
                    amount: entry.value(),
                    registration_id: token.amount,
                    entry: entry.clone(),
                })
            }
            _ => return Err(Error::MalformedToken(entry.outpoint)),
        };
        Ok(role)
    }
}

/// A set of outputs with their roles, sorted by outpoint so that every
/// finder picks the same candidate among equally eligible ones.
#[derive(Clone, Debug, Default)]
pub struct ClassifiedUtxos {
    utxos: Vec<ClassifiedUtxo>,
}

impl ClassifiedUtxos {
    /// Fails with [`Error::MalformedToken`] when an output of the registry
    /// category matches no known role.
    pub fn classify(entries: impl IntoIterator<Item = UtxoEntry>, context: &ClassificationContext) -> Result<Self> {
        let mut utxos = entries
            .into_iter()
            .map(|entry| {
                let role = context.classify(&entry).map_err(|err| match err {
                    Error::MalformedCommitment(_) => Error::MalformedToken(entry.outpoint),
                    err => err,
                })?;
                Ok(ClassifiedUtxo { entry, role })
            })
            .collect::<Result<Vec<_>>>()?;
        utxos.sort_by_key(|utxo| utxo.entry.outpoint);
        utxos.dedup_by_key(|utxo| utxo.entry.outpoint);
        Ok(Self { utxos })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedUtxo> {
        self.utxos.iter()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    pub fn extend(&mut self, other: ClassifiedUtxos) {
        self.utxos.extend(other.utxos);
        self.utxos.sort_by_key(|utxo| utxo.entry.outpoint);
        self.utxos.dedup_by_key(|utxo| utxo.entry.outpoint);
    }

    /// The thread NFT authorizing `covenant`.
    pub fn thread(&self, covenant: &Covenant) -> Result<&ClassifiedUtxo> {
        self.utxos
            .iter()
            .find(|utxo| matches!(&utxo.role, UtxoRole::Thread { authorized } if authorized == covenant.locking_bytecode()))
            .ok_or_else(|| Error::ThreadNotFound(covenant.name().to_string()))
    }

    /// The registration counter and the id it assigns next.
    pub fn registration_counter(&self) -> Result<(&ClassifiedUtxo, u64)> {
        self.utxos
            .iter()
            .find_map(|utxo| match utxo.role {
                UtxoRole::RegistrationCounter { next_registration_id } => Some((utxo, next_registration_id)),
                _ => None,
            })
            .ok_or(Error::RegistrationCounterNotFound)
    }

    pub fn claim_minting(&self) -> Result<&ClassifiedUtxo> {
        self.utxos.iter().find(|utxo| utxo.role == UtxoRole::ClaimMinting).ok_or(Error::ClaimMintingNotFound)
    }

    /// Every running auction, ascending by registration id.
    pub fn auctions(&self) -> Vec<&Auction> {
        let mut auctions: Vec<_> = self
            .utxos
            .iter()
            .filter_map(|utxo| match &utxo.role {
                UtxoRole::Auction(auction) => Some(auction),
                _ => None,
            })
            .collect();
        auctions.sort_by_key(|auction| (auction.registration_id, auction.entry.outpoint));
        auctions
    }

    /// Running auctions of `name`, ascending by registration id.
    pub fn running_auctions(&self, name: &[u8]) -> Vec<&Auction> {
        self.auctions().into_iter().filter(|auction| auction.name == name).collect()
    }

    /// The auction of `name` with the lowest registration id.
    pub fn auction(&self, name: &[u8]) -> Result<&Auction> {
        self.running_auctions(name).into_iter().next().ok_or_else(|| Error::AuctionNotFound(display_name(name)))
    }

    /// The ownership token of `name` with the lowest registration id.
    pub fn ownership(&self, name: &[u8]) -> Result<(&ClassifiedUtxo, u64)> {
        self.utxos
            .iter()
            .filter_map(|utxo| match &utxo.role {
                UtxoRole::Ownership { registration_id, name: owned } if owned == name => Some((utxo, *registration_id)),
                _ => None,
            })
            .min_by_key(|(utxo, registration_id)| (*registration_id, utxo.entry.outpoint))
            .ok_or_else(|| Error::OwnershipNotFound(display_name(name)))
    }

    /// Internal authorization tokens, ascending by registration id.
    pub fn internal_auths(&self) -> Vec<(&ClassifiedUtxo, u64)> {
        let mut auths: Vec<_> = self
            .utxos
            .iter()
            .filter_map(|utxo| match utxo.role {
                UtxoRole::InternalAuth { registration_id } => Some((utxo, registration_id)),
                _ => None,
            })
            .collect();
        auths.sort_by_key(|(utxo, registration_id)| (*registration_id, utxo.entry.outpoint));
        auths
    }

    /// The canonical internal authorization token: the one with the lowest registration id.
    pub fn internal_auth(&self, name: &[u8]) -> Result<(&ClassifiedUtxo, u64)> {
        self.internal_auths().into_iter().next().ok_or_else(|| Error::InternalAuthNotFound(display_name(name)))
    }

    pub fn external_auth(&self, name: &[u8]) -> Result<&ClassifiedUtxo> {
        self.utxos.iter().find(|utxo| utxo.role == UtxoRole::ExternalAuth).ok_or_else(|| Error::ExternalAuthNotFound(display_name(name)))
    }

    /// A thread NFT holding fungible tokens, other than the one at `exclude`.
    pub fn token_thread(&self, exclude: &TransactionOutpoint) -> Result<&ClassifiedUtxo> {
        self.utxos
            .iter()
            .find(|utxo| matches!(utxo.role, UtxoRole::Thread { .. }) && utxo.token_amount() > 0 && utxo.entry.outpoint != *exclude)
            .ok_or(Error::TokenThreadNotFound)
    }

    /// The largest pure BCH P2PKH output worth at least `min_value`.
    pub fn funding(&self, min_value: u64) -> Result<&ClassifiedUtxo> {
        self.utxos
            .iter()
            .filter(|utxo| utxo.role == UtxoRole::Funding && utxo.value() >= min_value)
            .max_by_key(|utxo| (utxo.value(), std::cmp::Reverse(utxo.entry.outpoint)))
            .ok_or(Error::FundingNotFound(min_value))
    }

    /// A token-free output sitting at `covenant`, spent alongside its thread.
    pub fn authorized_contract_utxo(&self, covenant: &Covenant) -> Result<&ClassifiedUtxo> {
        self.utxos
            .iter()
            .find(|utxo| utxo.entry.token().is_none() && utxo.entry.locking_bytecode() == covenant.locking_bytecode())
            .ok_or_else(|| Error::AuthorizedContractNotFound(covenant.name().to_string()))
    }
}
