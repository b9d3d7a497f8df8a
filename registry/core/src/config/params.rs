use crate::error::Error;
use crate::result::Result;
use crate::tx::FeePolicy;
use bitcann_addresses::Prefix;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    #[default]
    Mainnet,
    Testnet,
    Regtest,
}

impl NetworkType {
    pub fn prefix(&self) -> Prefix {
        match self {
            NetworkType::Mainnet => Prefix::Mainnet,
            NetworkType::Testnet => Prefix::Testnet,
            NetworkType::Regtest => Prefix::Regtest,
        }
    }
}

impl Display for NetworkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NetworkType::Mainnet => "mainnet",
            NetworkType::Testnet => "testnet",
            NetworkType::Regtest => "regtest",
        })
    }
}

impl FromStr for NetworkType {
    type Err = crate::error::Error;

    fn from_str(network: &str) -> std::result::Result<Self, Self::Err> {
        match network {
            "mainnet" => Ok(NetworkType::Mainnet),
            "testnet" => Ok(NetworkType::Testnet),
            "regtest" => Ok(NetworkType::Regtest),
            _ => Err(format!("unknown network type '{network}'").into()),
        }
    }
}

/// Largest relative lock-time in blocks. Sequence numbers keep the block
/// count in their low 16 bits, the bits above select other lock semantics.
pub const MAX_MIN_WAIT_TIME: u32 = 0xffff;

/// Registry parameters. The pricing and timing values are baked into the
/// covenants as constructor arguments: a value that differs from the one the
/// registry was deployed with derives different contract addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub network: NetworkType,

    /// Starting price of the first auction, in satoshis
    pub min_starting_bid: u64,

    /// Lowest auction starting price regardless of the registration id
    pub auction_price_floor: u64,

    /// Minimum increase of each bid over the previous one, in percent
    pub min_bid_increase_percentage: u64,

    /// Relative lock-time (in blocks) an auction must age before it can be claimed
    pub min_wait_time: u32,

    pub creator_incentive_fixed_deduction: u64,
    pub creator_incentive_upper_bound: u64,
    /// Incentives at or below this value are not paid
    pub creator_incentive_threshold: u64,

    /// Satoshis per serialized byte
    pub fee_rate: u64,

    /// Upper bound on the transfers followed when resolving an owner
    pub max_resolution_hops: usize,
}

impl Params {
    pub fn prefix(&self) -> Prefix {
        self.network.prefix()
    }

    pub fn fee_policy(&self) -> FeePolicy {
        FeePolicy::new(self.fee_rate)
    }

    /// Checks the values the covenants and transactions cannot represent.
    pub fn validate(&self) -> Result<()> {
        if self.min_wait_time > MAX_MIN_WAIT_TIME {
            return Err(Error::InvalidParams(format!("min_wait_time {} exceeds {MAX_MIN_WAIT_TIME} blocks", self.min_wait_time)));
        }
        if self.creator_incentive_upper_bound == 0 {
            return Err(Error::InvalidParams("creator_incentive_upper_bound must not be zero".into()));
        }
        Ok(())
    }

    pub fn override_params(self, overrides: OverrideParams) -> Self {
        Self {
            network: overrides.network.unwrap_or(self.network),
            min_starting_bid: overrides.min_starting_bid.unwrap_or(self.min_starting_bid),
            auction_price_floor: overrides.auction_price_floor.unwrap_or(self.auction_price_floor),
            min_bid_increase_percentage: overrides.min_bid_increase_percentage.unwrap_or(self.min_bid_increase_percentage),
            min_wait_time: overrides.min_wait_time.unwrap_or(self.min_wait_time),
            creator_incentive_fixed_deduction: overrides
                .creator_incentive_fixed_deduction
                .unwrap_or(self.creator_incentive_fixed_deduction),
            creator_incentive_upper_bound: overrides.creator_incentive_upper_bound.unwrap_or(self.creator_incentive_upper_bound),
            creator_incentive_threshold: overrides.creator_incentive_threshold.unwrap_or(self.creator_incentive_threshold),
            fee_rate: overrides.fee_rate.unwrap_or(self.fee_rate),
            max_resolution_hops: overrides.max_resolution_hops.unwrap_or(self.max_resolution_hops),
        }
    }
}

impl From<NetworkType> for Params {
    fn from(value: NetworkType) -> Self {
        match value {
            NetworkType::Mainnet => MAINNET_PARAMS,
            NetworkType::Testnet => TESTNET_PARAMS,
            NetworkType::Regtest => REGTEST_PARAMS,
        }
    }
}

/// Optional replacements for individual [`Params`] fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideParams {
    pub network: Option<NetworkType>,
    pub min_starting_bid: Option<u64>,
    pub auction_price_floor: Option<u64>,
    pub min_bid_increase_percentage: Option<u64>,
    pub min_wait_time: Option<u32>,
    pub creator_incentive_fixed_deduction: Option<u64>,
    pub creator_incentive_upper_bound: Option<u64>,
    pub creator_incentive_threshold: Option<u64>,
    pub fee_rate: Option<u64>,
    pub max_resolution_hops: Option<usize>,
}

impl From<Params> for OverrideParams {
    fn from(p: Params) -> Self {
        Self {
            network: Some(p.network),
            min_starting_bid: Some(p.min_starting_bid),
            auction_price_floor: Some(p.auction_price_floor),
            min_bid_increase_percentage: Some(p.min_bid_increase_percentage),
            min_wait_time: Some(p.min_wait_time),
            creator_incentive_fixed_deduction: Some(p.creator_incentive_fixed_deduction),
            creator_incentive_upper_bound: Some(p.creator_incentive_upper_bound),
            creator_incentive_threshold: Some(p.creator_incentive_threshold),
            fee_rate: Some(p.fee_rate),
            max_resolution_hops: Some(p.max_resolution_hops),
        }
    }
}

pub const MAINNET_PARAMS: Params = Params {
    network: NetworkType::Mainnet,
    min_starting_bid: 100_000,
    auction_price_floor: 20_000,
    min_bid_increase_percentage: 5,
    min_wait_time: 144,
    creator_incentive_fixed_deduction: 5_000,
    creator_incentive_upper_bound: 1_000_000,
    creator_incentive_threshold: 546,
    fee_rate: 1,
    max_resolution_hops: 1_000,
};

pub const TESTNET_PARAMS: Params = Params { network: NetworkType::Testnet, ..MAINNET_PARAMS };

/// Regtest auctions mature after a single block.
pub const REGTEST_PARAMS: Params = Params { network: NetworkType::Regtest, min_wait_time: 1, ..MAINNET_PARAMS };
