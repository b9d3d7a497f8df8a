//!
//! Deterministic deployments, outputs and addresses for tests.
//!

use crate::config::MAINNET_PARAMS;
use crate::contracts::{AbiFunction, AbiInput, ArtifactSet, CovenantArtifact};
use crate::imports::*;
use crate::name::{auction_commitment, encode_registration_id};
use bitcann_addresses::Version;
use bitcann_txscript::pay_to_address_script;

pub const TEST_PARAMS: Params = MAINNET_PARAMS;

pub fn test_category() -> TokenCategory {
    Hash::from_bytes([0xca; 32])
}

fn inputs(inputs: &[(&str, &str)]) -> Vec<AbiInput> {
    inputs.iter().map(|(name, ty)| AbiInput { name: name.to_string(), ty: ty.to_string() }).collect()
}

fn artifact(contract_name: &str, constructor_inputs: &[(&str, &str)], abi: Vec<(&str, Vec<(&str, &str)>)>, bytecode: &str) -> CovenantArtifact {
    CovenantArtifact {
        contract_name: contract_name.to_string(),
        constructor_inputs: inputs(constructor_inputs),
        abi: abi.into_iter().map(|(name, arguments)| AbiFunction { name: name.to_string(), inputs: inputs(&arguments) }).collect(),
        bytecode: bytecode.to_string(),
    }
}

/// Artifacts with the real signatures and placeholder bytecode.
pub fn test_artifacts() -> ArtifactSet {
    let call = || -> Vec<(&'static str, Vec<(&'static str, &'static str)>)> { vec![("call", vec![])] };
    ArtifactSet {
        registry: artifact("Registry", &[("domainCategory", "bytes32")], call(), "c0c1"),
        auction: artifact("Auction", &[("minStartingBid", "int")], call(), "c0c2"),
        bid: artifact("Bid", &[("minBidIncreasePercentage", "int")], call(), "c0c3"),
        factory: artifact("Factory", &[("nameContractBytecode", "bytes"), ("minWaitTime", "int")], call(), "c0c4"),
        auction_name_enforcer: artifact("AuctionNameEnforcer", &[], vec![("call", vec![("characterNumber", "int")])], "c0c5"),
        auction_conflict_resolver: artifact("AuctionConflictResolver", &[], call(), "c0c6"),
        name_ownership_guard: artifact("NameOwnershipGuard", &[("nameContractBytecode", "bytes")], call(), "c0c7"),
        accumulator: artifact("Accumulator", &[], call(), "c0c8"),
        name: artifact("Name", &[("name", "bytes"), ("domainCategory", "bytes32")], vec![("useAuth", vec![("authID", "int")]), ("burn", vec![])], "c0c9"),
    }
}

pub fn test_contracts() -> RegistryContracts {
    RegistryContracts::new(test_artifacts(), test_category(), &TEST_PARAMS).unwrap()
}

pub fn test_address(n: u8) -> Address {
    Address::new(Prefix::Mainnet, Version::P2pkh, &[n; 20])
}

pub fn outpoint(n: u8) -> TransactionOutpoint {
    TransactionOutpoint::new(Hash::from_bytes([n; 32]), 0)
}

pub fn p2pkh_locking(pkh: [u8; 20]) -> LockingBytecode {
    pay_to_address_script(&Address::new(Prefix::Mainnet, Version::P2pkh, &pkh))
}

pub fn bch_entry(n: u8, locking_bytecode: LockingBytecode, value: u64) -> UtxoEntry {
    UtxoEntry::new(outpoint(n), TransactionOutput::new(value, locking_bytecode), Some(100))
}

pub fn p2pkh_entry(n: u8, pkh: [u8; 20], value: u64) -> UtxoEntry {
    bch_entry(n, p2pkh_locking(pkh), value)
}

pub fn token_entry(n: u8, locking_bytecode: LockingBytecode, value: u64, token: TokenData) -> UtxoEntry {
    UtxoEntry::new(outpoint(n), TransactionOutput::with_token(value, locking_bytecode, token), Some(100))
}

pub fn thread_entry(contracts: &RegistryContracts, n: u8, authorized: &Covenant, amount: u64) -> UtxoEntry {
    let token = TokenData::nft(contracts.category, Capability::None, authorized.locking_bytecode().script().to_vec()).with_amount(amount);
    token_entry(n, contracts.registry.locking_bytecode().clone(), 1_000, token)
}

pub fn auction_entry(contracts: &RegistryContracts, n: u8, name: &[u8], bidder: [u8; 20], value: u64, registration_id: u64) -> UtxoEntry {
    let token = TokenData::nft(contracts.category, Capability::Mutable, auction_commitment(&bidder, name)).with_amount(registration_id);
    token_entry(n, contracts.registry.locking_bytecode().clone(), value, token)
}

/// The registry address right after deployment: one thread per authorized
/// covenant, the registration counter and the claim minting token.
pub fn registry_genesis(contracts: &RegistryContracts, next_registration_id: u64, counter_amount: u64) -> Vec<UtxoEntry> {
    let registry = contracts.registry.locking_bytecode().clone();
    let mut entries: Vec<_> =
        contracts.authorized_contracts().into_iter().enumerate().map(|(i, covenant)| thread_entry(contracts, 10 + i as u8, covenant, 0)).collect();
    let counter = TokenData::nft(contracts.category, Capability::Minting, encode_registration_id(next_registration_id).to_vec())
        .with_amount(counter_amount);
    entries.push(token_entry(30, registry.clone(), 1_000, counter));
    entries.push(token_entry(31, registry, 1_000, TokenData::nft(contracts.category, Capability::Minting, vec![])));
    entries
}

/// The token-free output sitting at the address of `covenant`.
pub fn covenant_entry(contracts: &RegistryContracts, covenant: &Covenant) -> UtxoEntry {
    let position = contracts.authorized_contracts().iter().position(|authorized| *authorized == covenant).unwrap_or(0);
    bch_entry(20 + position as u8, covenant.locking_bytecode().clone(), 1_000)
}

/// One token-free output at every authorized covenant address.
pub fn covenant_entries(contracts: &RegistryContracts) -> Vec<UtxoEntry> {
    contracts.authorized_contracts().into_iter().map(|covenant| covenant_entry(contracts, covenant)).collect()
}

/// Registry outputs merged with the outputs at `covenant`, the way the
/// name service assembles them from two address queries.
pub fn with_covenant(contracts: &RegistryContracts, mut registry: ClassifiedUtxos, covenant: &Covenant) -> ClassifiedUtxos {
    registry.extend(classify(contracts, vec![covenant_entry(contracts, covenant)]));
    registry
}

pub fn classify(contracts: &RegistryContracts, entries: Vec<UtxoEntry>) -> ClassifiedUtxos {
    ClassifiedUtxos::classify(entries, &contracts.classification_context()).unwrap()
}
