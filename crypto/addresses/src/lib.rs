use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

mod cashaddr;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum AddressError {
    #[error("Invalid prefix {0}")]
    InvalidPrefix(String),

    #[error("Prefix is missing")]
    MissingPrefix,

    #[error("Invalid version {0}")]
    InvalidVersion(u8),

    #[error("Invalid payload length {length} for address version {version}")]
    InvalidPayloadLength { version: Version, length: usize },

    #[error("Invalid character {0}")]
    DecodingError(char),

    #[error("Mixed-case address")]
    MixedCase,

    #[error("Checksum is invalid")]
    BadChecksum,

    #[error("Non-zero or oversized padding")]
    BadPadding,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
pub enum Prefix {
    #[serde(rename = "bitcoincash")]
    Mainnet,
    #[serde(rename = "bchtest")]
    Testnet,
    #[serde(rename = "bchreg")]
    Regtest,
}

impl Prefix {
    fn as_str(&self) -> &'static str {
        match self {
            Prefix::Mainnet => "bitcoincash",
            Prefix::Testnet => "bchtest",
            Prefix::Regtest => "bchreg",
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Prefix {
    type Error = AddressError;

    fn try_from(prefix: &str) -> Result<Self, Self::Error> {
        match prefix {
            "bitcoincash" => Ok(Prefix::Mainnet),
            "bchtest" => Ok(Prefix::Testnet),
            "bchreg" => Ok(Prefix::Regtest),
            _ => Err(AddressError::InvalidPrefix(prefix.to_string())),
        }
    }
}

///
/// CashAddr version byte: the high bits select the address type, the low
/// three bits the hash size (0 for 20 bytes, 3 for 32 bytes).
///
/// Token-aware versions signal that the receiver can handle CashTokens;
/// they lock to exactly the same script as their plain counterparts.
///
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Version {
    /// Pay to public key hash
    P2pkh = 0x00,
    /// Pay to 20-byte script hash
    P2sh20 = 0x08,
    /// Pay to 32-byte script hash
    P2sh32 = 0x0b,
    /// Token-aware pay to public key hash
    TokenP2pkh = 0x10,
    /// Token-aware pay to 20-byte script hash
    TokenP2sh20 = 0x18,
    /// Token-aware pay to 32-byte script hash
    TokenP2sh32 = 0x1b,
}

impl Version {
    pub fn payload_len(&self) -> usize {
        match self {
            Version::P2pkh | Version::P2sh20 | Version::TokenP2pkh | Version::TokenP2sh20 => 20,
            Version::P2sh32 | Version::TokenP2sh32 => 32,
        }
    }

    pub fn is_token_aware(&self) -> bool {
        matches!(self, Version::TokenP2pkh | Version::TokenP2sh20 | Version::TokenP2sh32)
    }

    pub fn is_pubkey_hash(&self) -> bool {
        matches!(self, Version::P2pkh | Version::TokenP2pkh)
    }

    pub fn to_token_aware(self) -> Self {
        match self {
            Version::P2pkh => Version::TokenP2pkh,
            Version::P2sh20 => Version::TokenP2sh20,
            Version::P2sh32 => Version::TokenP2sh32,
            token_aware => token_aware,
        }
    }

    pub fn to_plain(self) -> Self {
        match self {
            Version::TokenP2pkh => Version::P2pkh,
            Version::TokenP2sh20 => Version::P2sh20,
            Version::TokenP2sh32 => Version::P2sh32,
            plain => plain,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = AddressError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Version::P2pkh),
            0x08 => Ok(Version::P2sh20),
            0x0b => Ok(Version::P2sh32),
            0x10 => Ok(Version::TokenP2pkh),
            0x18 => Ok(Version::TokenP2sh20),
            0x1b => Ok(Version::TokenP2sh32),
            _ => Err(AddressError::InvalidVersion(value)),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Version::P2pkh => "P2PKH",
            Version::P2sh20 => "P2SH20",
            Version::P2sh32 => "P2SH32",
            Version::TokenP2pkh => "TokenP2PKH",
            Version::TokenP2sh20 => "TokenP2SH20",
            Version::TokenP2sh32 => "TokenP2SH32",
        })
    }
}

/// Size of the payload vector of an address.
///
/// This size is the smallest SmallVec supported backing store size greater or equal to the largest
/// possible payload, which is 32 for the P2SH32 versions.
pub const PAYLOAD_VECTOR_SIZE: usize = 32;

/// Used as the underlying type for address payload, optimized for the largest version length (32).
pub type PayloadVec = SmallVec<[u8; PAYLOAD_VECTOR_SIZE]>;

/// CashAddr `Address` that serializes to and from an address format string: `bitcoincash:qr6m...ekg2`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct Address {
    pub prefix: Prefix,
    pub version: Version,
    pub payload: PayloadVec,
}

impl Address {
    /// Panics if the payload length does not match the version.
    pub fn new(prefix: Prefix, version: Version, payload: &[u8]) -> Self {
        assert_eq!(payload.len(), version.payload_len(), "{version} payload");
        Self { prefix, payload: PayloadVec::from_slice(payload), version }
    }

    pub fn try_new(prefix: Prefix, version: Version, payload: &[u8]) -> Result<Self, AddressError> {
        if payload.len() != version.payload_len() {
            return Err(AddressError::InvalidPayloadLength { version, length: payload.len() });
        }
        Ok(Self { prefix, payload: PayloadVec::from_slice(payload), version })
    }

    pub fn to_token_aware(&self) -> Self {
        Self { version: self.version.to_token_aware(), ..self.clone() }
    }

    pub fn to_plain(&self) -> Self {
        Self { version: self.version.to_plain(), ..self.clone() }
    }

    /// Both forms of an address lock to the same script.
    pub fn same_destination(&self, other: &Address) -> bool {
        self.prefix == other.prefix && self.version.to_plain() == other.version.to_plain() && self.payload == other.payload
    }

    /// The CashAddr string without its prefix.
    pub fn payload_str(&self) -> String {
        self.encode_payload()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.prefix, self.encode_payload())
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        (&address).into()
    }
}

impl From<&Address> for String {
    fn from(address: &Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let has_lower = value.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = value.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            return Err(AddressError::MixedCase);
        }
        let value = value.to_ascii_lowercase();
        match value.split_once(':') {
            Some((prefix, payload)) => Self::decode_payload(prefix.try_into()?, payload),
            None => Err(AddressError::MissingPrefix),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.try_into()
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(AddressVisitor)
    }
}

struct AddressVisitor;

impl serde::de::Visitor<'_> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "valid CashAddr address string")
    }

    fn visit_str<E>(self, str: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Address::try_from(str).map_err(|_| serde::de::Error::invalid_value(serde::de::Unexpected::Str(str), &self))
    }
}
