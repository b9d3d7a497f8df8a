//! Serde helpers for byte strings: hex in human-readable formats, raw bytes otherwise.
//!
//! Use with `#[serde(with = "serde_bytes")]` on any field whose type converts
//! from a `Vec<u8>` and exposes its bytes.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]> + ?Sized,
    S: Serializer,
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&faster_hex::hex_string(bytes.as_ref()))
    } else {
        serializer.serialize_bytes(bytes.as_ref())
    }
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: From<Vec<u8>>,
    D: Deserializer<'de>,
{
    if deserializer.is_human_readable() {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        from_hex(&s).map(T::from).map_err(serde::de::Error::custom)
    } else {
        <Vec<u8> as Deserialize>::deserialize(deserializer).map(T::from)
    }
}

/// Decodes a hex string of any even length.
pub fn from_hex(hex_str: &str) -> Result<Vec<u8>, faster_hex::Error> {
    if hex_str.is_empty() {
        return Ok(vec![]);
    }
    if hex_str.len() % 2 != 0 {
        return Err(faster_hex::Error::InvalidLength(hex_str.len()));
    }
    let mut bytes = vec![0u8; hex_str.len() / 2];
    faster_hex::hex_decode(hex_str.as_bytes(), &mut bytes)?;
    Ok(bytes)
}

pub fn to_hex(bytes: &[u8]) -> String {
    faster_hex::hex_string(bytes)
}
