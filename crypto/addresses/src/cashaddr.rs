//!
//! CashAddr payload codec: base32 over the version byte and hash, guarded by
//! a 40-bit BCH checksum that also covers the prefix.
//!

use crate::{Address, AddressError, Prefix, Version};

/// Number of 5-bit groups holding the checksum.
const CHECKSUM_LEN: usize = 8;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Generator constants of the checksum, one per bit of the top group.
const GENERATORS: [u64; 5] = [0x98f2bc8e61, 0x79b76d99e2, 0xf33e5fb3c4, 0xae2eabe2a8, 0x1e4f43e470];

fn charset_index(c: char) -> Result<u8, AddressError> {
    CHARSET.iter().position(|&symbol| symbol as char == c).map(|index| index as u8).ok_or(AddressError::DecodingError(c))
}

fn polymod(values: impl Iterator<Item = u8>) -> u64 {
    values.fold(1u64, |c, value| {
        let top = c >> 35;
        let c = ((c & 0x07_ffff_ffff) << 5) ^ value as u64;
        GENERATORS.iter().enumerate().filter(|(bit, _)| top >> bit & 1 == 1).fold(c, |c, (_, generator)| c ^ generator)
    }) ^ 1
}

/// Checksum of the 5-bit `payload` under `prefix`, as 8 groups of 5 bits.
fn checksum(prefix: Prefix, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let prefix = prefix.as_str().bytes().map(|c| c & 0x1f);
    let value = polymod(prefix.chain([0]).chain(payload.iter().copied()).chain([0; CHECKSUM_LEN]));
    std::array::from_fn(|i| ((value >> (5 * (CHECKSUM_LEN - 1 - i))) & 0x1f) as u8)
}

/// Regroups `data` from `from`-bit to `to`-bit groups. Encoding pads the last
/// group with zeros; decoding requires that padding to be shorter than `from`
/// bits and all zero.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut accumulator = 0u32;
    let mut bits = 0u32;
    let mask = (1u32 << to) - 1;
    let window = (1u32 << (from + to - 1)) - 1;
    let mut converted = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        accumulator = ((accumulator << from) | value as u32) & window;
        bits += from;
        while bits >= to {
            bits -= to;
            converted.push(((accumulator >> bits) & mask) as u8);
        }
    }
    if pad {
        if bits > 0 {
            converted.push(((accumulator << (to - bits)) & mask) as u8);
        }
    } else if bits >= from || (accumulator << (to - bits)) & mask != 0 {
        return None;
    }
    Some(converted)
}

impl Address {
    pub(crate) fn encode_payload(&self) -> String {
        let versioned: Vec<u8> = std::iter::once(self.version as u8).chain(self.payload.iter().copied()).collect();
        let mut groups = convert_bits(&versioned, 8, 5, true).unwrap_or_default();
        groups.extend(checksum(self.prefix, &groups));
        groups.into_iter().map(|group| CHARSET[group as usize] as char).collect()
    }

    pub(crate) fn decode_payload(prefix: Prefix, address: &str) -> Result<Self, AddressError> {
        let groups = address.chars().map(charset_index).collect::<Result<Vec<u8>, _>>()?;
        if groups.len() <= CHECKSUM_LEN {
            return Err(AddressError::BadChecksum);
        }
        let (data, expected) = groups.split_at(groups.len() - CHECKSUM_LEN);
        if checksum(prefix, data) != expected {
            return Err(AddressError::BadChecksum);
        }
        let bytes = convert_bits(data, 5, 8, false).ok_or(AddressError::BadPadding)?;
        let (&version, payload) = bytes.split_first().ok_or(AddressError::BadPadding)?;
        Address::try_new(prefix, Version::try_from(version)?, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_bits() {
        assert_eq!(convert_bits(&[0xff], 8, 5, true), Some(vec![0x1f, 0x1c]));
        assert_eq!(convert_bits(&[0x1f, 0x1c], 5, 8, false), Some(vec![0xff]));
        // non-zero padding bits
        assert_eq!(convert_bits(&[0x1f, 0x1d], 5, 8, false), None);
        // a whole spare group of padding
        assert_eq!(convert_bits(&[0x1f, 0x1c, 0x00], 5, 8, false), None);
    }

    #[test]
    fn test_checksum_covers_prefix() {
        let groups = convert_bits(&[0u8; 21], 8, 5, true).unwrap();
        assert_ne!(checksum(Prefix::Mainnet, &groups), checksum(Prefix::Testnet, &groups));
    }
}
