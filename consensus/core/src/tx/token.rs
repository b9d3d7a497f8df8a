//!
//! CashTokens token data carried by transaction outputs.
//!

use crate::errors::DecodeError;
use bitcann_hashes::Hash;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Token category: the id of the transaction whose first input's outpoint created the token,
/// kept in wire byte order like any transaction id.
pub type TokenCategory = Hash;

/// First byte of a token prefix inside an output's locking bytecode field.
pub const PREFIX_TOKEN: u8 = 0xef;

pub const TOKEN_BITFIELD_RESERVED: u8 = 0x80;
pub const TOKEN_BITFIELD_HAS_COMMITMENT_LENGTH: u8 = 0x40;
pub const TOKEN_BITFIELD_HAS_NFT: u8 = 0x20;
pub const TOKEN_BITFIELD_HAS_AMOUNT: u8 = 0x10;
pub const TOKEN_BITFIELD_CAPABILITY_MASK: u8 = 0x0f;

/// NFT capability
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Capability {
    /// Immutable NFT
    #[default]
    None = 0,
    /// The commitment may be changed when spent
    Mutable = 1,
    /// May create new NFTs of the same category
    Minting = 2,
}

impl TryFrom<u8> for Capability {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Capability::None),
            1 => Ok(Capability::Mutable),
            2 => Ok(Capability::Minting),
            _ => Err(DecodeError::InvalidCapability(value)),
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Capability::None => "none",
            Capability::Mutable => "mutable",
            Capability::Minting => "minting",
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NftData {
    pub capability: Capability,
    #[serde(with = "crate::serde_bytes")]
    pub commitment: Vec<u8>,
}

impl NftData {
    pub fn new(capability: Capability, commitment: Vec<u8>) -> Self {
        Self { capability, commitment }
    }
}

/// Tokens held by a single output: a fungible amount of `category` and at most one NFT.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub category: TokenCategory,
    pub amount: u64,
    pub nft: Option<NftData>,
}

impl TokenData {
    pub fn new(category: TokenCategory, amount: u64, nft: Option<NftData>) -> Self {
        Self { category, amount, nft }
    }

    pub fn fungible(category: TokenCategory, amount: u64) -> Self {
        Self { category, amount, nft: None }
    }

    pub fn nft(category: TokenCategory, capability: Capability, commitment: Vec<u8>) -> Self {
        Self { category, amount: 0, nft: Some(NftData::new(capability, commitment)) }
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_commitment(mut self, commitment: Vec<u8>) -> Self {
        if let Some(nft) = self.nft.as_mut() {
            nft.commitment = commitment;
        }
        self
    }

    pub fn capability(&self) -> Option<Capability> {
        self.nft.as_ref().map(|nft| nft.capability)
    }

    /// NFT commitment, empty when the output holds no NFT.
    pub fn commitment(&self) -> &[u8] {
        self.nft.as_ref().map(|nft| nft.commitment.as_slice()).unwrap_or_default()
    }

    pub fn has_nft(&self) -> bool {
        self.nft.is_some()
    }

    pub fn is_nft_of(&self, category: &TokenCategory, capability: Capability) -> bool {
        self.category == *category && self.capability() == Some(capability)
    }

    /// Token prefix bitfield describing which optional fields follow the category.
    pub fn bitfield(&self) -> u8 {
        let mut bitfield = 0u8;
        if let Some(nft) = &self.nft {
            bitfield |= TOKEN_BITFIELD_HAS_NFT | nft.capability as u8;
            if !nft.commitment.is_empty() {
                bitfield |= TOKEN_BITFIELD_HAS_COMMITMENT_LENGTH;
            }
        }
        if self.amount > 0 {
            bitfield |= TOKEN_BITFIELD_HAS_AMOUNT;
        }
        bitfield
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitfield() {
        let category = TokenCategory::from_bytes([1; 32]);
        assert_eq!(TokenData::fungible(category, 5).bitfield(), 0x10);
        assert_eq!(TokenData::nft(category, Capability::None, vec![]).bitfield(), 0x20);
        assert_eq!(TokenData::nft(category, Capability::Mutable, vec![1]).bitfield(), 0x61);
        assert_eq!(TokenData::nft(category, Capability::Minting, vec![1]).with_amount(7).bitfield(), 0x72);
    }

    #[test]
    fn test_accessors() {
        let category = TokenCategory::from_bytes([2; 32]);
        let token = TokenData::fungible(category, 9);
        assert_eq!(token.capability(), None);
        assert!(token.commitment().is_empty());

        let token = TokenData::nft(category, Capability::Mutable, vec![0xaa]).with_commitment(vec![0xbb, 0xcc]);
        assert!(token.is_nft_of(&category, Capability::Mutable));
        assert!(!token.is_nft_of(&category, Capability::Minting));
        assert_eq!(token.commitment(), &[0xbb, 0xcc]);
    }
}
