use crate::imports::*;
use crate::name::{PubKeyHash, display_name};

/// A running auction, as read from its registry output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub name: Vec<u8>,
    pub bidder: PubKeyHash,
    /// Current bid: the satoshi value of the auction output.
    pub amount: u64,
    /// Fungible amount of the auction output.
    pub registration_id: u64,
    pub entry: UtxoEntry,
}

impl Auction {
    pub fn name_str(&self) -> String {
        display_name(&self.name)
    }

    pub fn outpoint(&self) -> TransactionOutpoint {
        self.entry.outpoint
    }
}

/// Structural role of an output, derived once from its token and locking bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UtxoRole {
    /// Registry thread NFT; `authorized` is the locking bytecode of the covenant it authorizes.
    Thread { authorized: LockingBytecode },
    RegistrationCounter { next_registration_id: u64 },
    ClaimMinting,
    Auction(Auction),
    Ownership { registration_id: u64, name: Vec<u8> },
    InternalAuth { registration_id: u64 },
    ExternalAuth,
    /// Pure BCH at a P2PKH address.
    Funding,
    /// Anything else: other categories, or pure BCH not locked to a P2PKH.
    Foreign,
}

impl UtxoRole {
    pub fn label(&self) -> &'static str {
        match self {
            UtxoRole::Thread { .. } => "thread",
            UtxoRole::RegistrationCounter { .. } => "registration counter",
            UtxoRole::ClaimMinting => "claim minting",
            UtxoRole::Auction(_) => "auction",
            UtxoRole::Ownership { .. } => "ownership",
            UtxoRole::InternalAuth { .. } => "internal authorization",
            UtxoRole::ExternalAuth => "external authorization",
            UtxoRole::Funding => "funding",
            UtxoRole::Foreign => "foreign",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedUtxo {
    pub entry: UtxoEntry,
    pub role: UtxoRole,
}

impl ClassifiedUtxo {
    pub fn outpoint(&self) -> TransactionOutpoint {
        self.entry.outpoint
    }

    pub fn value(&self) -> u64 {
        self.entry.value()
    }

    /// Fungible amount of the registry category, zero for foreign outputs.
    pub fn token_amount(&self) -> u64 {
        match &self.role {
            UtxoRole::Funding | UtxoRole::Foreign => 0,
            _ => self.entry.token().map(|token| token.amount).unwrap_or_default(),
        }
    }
}
