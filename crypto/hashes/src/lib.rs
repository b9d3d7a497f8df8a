use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub const HASH_SIZE: usize = 32;
pub const HASH160_SIZE: usize = 20;

#[derive(Error, Debug, Clone)]
pub enum HashError {
    #[error("expected {HASH_SIZE} bytes ({hex_chars} hex characters), got {0}", hex_chars = HASH_SIZE * 2)]
    InvalidLength(usize),

    #[error("hex decoding error: {0}")]
    Hex(#[from] faster_hex::Error),
}

/// A 32-byte hash kept in wire byte order.
///
/// Transaction ids and token categories travel over the wire in this order but
/// are displayed (and accepted by [`FromStr`]) byte-reversed, the way nodes,
/// indexers and explorers print them.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    #[inline(always)]
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Builds a hash from bytes given in display (reversed) order.
    pub fn from_reversed_bytes(mut bytes: [u8; HASH_SIZE]) -> Self {
        bytes.reverse();
        Hash(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, HashError> {
        let bytes: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| HashError::InvalidLength(bytes.len()))?;
        Ok(Hash(bytes))
    }

    #[inline(always)]
    pub const fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    #[inline(always)]
    pub fn to_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// Bytes in display order.
    pub fn to_reversed_bytes(self) -> [u8; HASH_SIZE] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&faster_hex::hex_string(&self.to_reversed_bytes()))
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({self})")
    }
}

impl FromStr for Hash {
    type Err = HashError;

    fn from_str(hash_str: &str) -> Result<Self, Self::Err> {
        if hash_str.len() != HASH_SIZE * 2 {
            return Err(HashError::InvalidLength(hash_str.len()));
        }
        let mut bytes = [0u8; HASH_SIZE];
        faster_hex::hex_decode(hash_str.as_bytes(), &mut bytes)?;
        Ok(Hash::from_reversed_bytes(bytes))
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() { serializer.serialize_str(&self.to_string()) } else { self.0.serialize(serializer) }
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = <String as Deserialize>::deserialize(deserializer)?;
            Hash::from_str(&s).map_err(serde::de::Error::custom)
        } else {
            <[u8; HASH_SIZE]>::deserialize(deserializer).map(Hash)
        }
    }
}

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    Sha256::digest(data).into()
}

/// Double SHA-256, used for transaction ids and P2SH32 script hashes.
pub fn hash256(data: &[u8]) -> Hash {
    Hash(Sha256::digest(Sha256::digest(data)).into())
}

/// RIPEMD-160 of SHA-256, used for public key hashes and P2SH20.
pub fn hash160(data: &[u8]) -> [u8; HASH160_SIZE] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// Electrum-protocol script hash of a locking bytecode. Its [`Display`] form is
/// the `scripthash` argument expected by electrum servers.
pub fn script_hash(locking_bytecode: &[u8]) -> Hash {
    Hash(sha256(locking_bytecode))
}
