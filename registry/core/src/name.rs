//!
//! Name and binary codecs: name validation, commitments, addresses and
//! script fragments shared by the builders and the resolver.
//!

use crate::error::Error;
use crate::result::Result;
use bitcann_addresses::{Address, Prefix, Version};
use bitcann_consensus_core::constants::MAX_COMMITMENT_LENGTH;
use bitcann_consensus_core::tx::LockingBytecode;
use bitcann_hashes::HASH160_SIZE;
use bitcann_txscript::{extract_null_data_pushes, pay_to_script_hash_script};

pub use bitcann_txscript::vm_number::{encode_vm_number, pad_vm_number};

/// Size of a registration id inside a commitment.
pub const REGISTRATION_ID_SIZE: usize = 8;

/// Longest name an auction commitment (bidder PKH followed by the name) can carry.
pub const MAX_NAME_LENGTH: usize = MAX_COMMITMENT_LENGTH - HASH160_SIZE;

pub type PubKeyHash = [u8; HASH160_SIZE];

#[inline]
fn is_valid_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}

/// Byte index of the first character outside `[A-Za-z0-9-]`.
///
/// Every allowed character is ASCII, so the index of the first offending byte
/// is also where the offending character starts. This index is the argument
/// the invalid-name penalty passes to its covenant.
pub fn find_first_invalid_byte_index(name: &[u8]) -> Option<usize> {
    name.iter().position(|byte| !is_valid_name_byte(*byte))
}

pub fn find_first_invalid_character_index(name: &str) -> Option<usize> {
    find_first_invalid_byte_index(name.as_bytes())
}

/// Non-empty and every character in `[A-Za-z0-9-]`. Names are byte exact:
/// no case folding or normalization is applied.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && find_first_invalid_character_index(name).is_none()
}

/// Checks a name can be auctioned.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    if let Some(index) = find_first_invalid_character_index(name) {
        return Err(Error::InvalidName { name: name.to_string(), index });
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(Error::NameTooLong(name.len()));
    }
    Ok(())
}

pub fn name_to_bytes(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

pub fn name_from_bytes(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::MalformedCommitment(format!("name is not UTF-8: {}", faster_hex::hex_string(bytes))))
}

/// Lossy rendering of name bytes for logs and error messages.
pub(crate) fn display_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Public key hash of a P2PKH address, plain or token-aware.
pub fn address_to_pkh(address: &Address) -> Result<PubKeyHash> {
    if !address.version.is_pubkey_hash() {
        return Err(Error::UnsupportedAddress(address.to_string()));
    }
    address.payload.as_slice().try_into().map_err(|_| Error::UnsupportedAddress(address.to_string()))
}

pub fn pkh_to_address(pkh: &PubKeyHash, prefix: Prefix, token_aware: bool) -> Address {
    let version = if token_aware { Version::TokenP2pkh } else { Version::P2pkh };
    Address::new(prefix, version, pkh)
}

pub fn encode_registration_id(registration_id: u64) -> [u8; REGISTRATION_ID_SIZE] {
    registration_id.to_be_bytes()
}

pub fn decode_registration_id(bytes: &[u8]) -> Result<u64> {
    let bytes: [u8; REGISTRATION_ID_SIZE] = bytes.try_into().map_err(|_| {
        Error::MalformedCommitment(format!("registration id must be {REGISTRATION_ID_SIZE} bytes, got {}", bytes.len()))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

/// Auction commitment: the bidder's public key hash followed by the name.
pub fn auction_commitment(bidder: &PubKeyHash, name: &[u8]) -> Vec<u8> {
    bidder.iter().chain(name).copied().collect()
}

/// Splits an auction commitment into bidder PKH and name bytes.
pub fn split_auction_commitment(commitment: &[u8]) -> Result<(PubKeyHash, &[u8])> {
    if commitment.len() <= HASH160_SIZE {
        return Err(Error::MalformedCommitment(format!("auction commitment of {} bytes", commitment.len())));
    }
    let (pkh, name) = commitment.split_at(HASH160_SIZE);
    let pkh: PubKeyHash = pkh.try_into().map_err(|_| Error::MalformedCommitment("auction bidder".to_string()))?;
    Ok((pkh, name))
}

/// Identity (ownership) token commitment: registration id followed by the name.
pub fn identity_commitment(registration_id: u64, name: &[u8]) -> Vec<u8> {
    encode_registration_id(registration_id).iter().chain(name).copied().collect()
}

pub fn split_identity_commitment(commitment: &[u8]) -> Result<(u64, &[u8])> {
    if commitment.len() <= REGISTRATION_ID_SIZE {
        return Err(Error::MalformedCommitment(format!("identity commitment of {} bytes", commitment.len())));
    }
    let (id, name) = commitment.split_at(REGISTRATION_ID_SIZE);
    Ok((decode_registration_id(id)?, name))
}

/// Elements pushed by an `OP_RETURN` output.
pub fn extract_op_return_pushes(locking_bytecode: &LockingBytecode) -> Result<Vec<Vec<u8>>> {
    Ok(extract_null_data_pushes(locking_bytecode.script())?)
}

/// `OP_HASH256 <hash256(redeem_script)> OP_EQUAL`
pub fn p2sh32_locking_bytecode(redeem_script: &[u8]) -> LockingBytecode {
    pay_to_script_hash_script(redeem_script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validity() {
        for name in ["alice", "Bob-42", "a", "0", "-", "x".repeat(MAX_NAME_LENGTH).as_str()] {
            assert!(is_valid_name(name), "{name}");
            assert_eq!(find_first_invalid_character_index(name), None);
            assert!(validate_name(name).is_ok());
        }
        for (name, index) in [("bad name!", 3), ("alice.bch", 5), ("_", 0), ("naïve", 2), ("ok\n", 2)] {
            assert!(!is_valid_name(name), "{name}");
            assert_eq!(find_first_invalid_character_index(name), Some(index), "{name}");
            assert!(matches!(validate_name(name), Err(Error::InvalidName { index: i, .. }) if i == index));
        }
        assert!(!is_valid_name(""));
        assert!(matches!(validate_name(""), Err(Error::EmptyName)));
        assert!(matches!(validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)), Err(Error::NameTooLong(109))));
    }

    #[test]
    fn test_invalid_index_equivalence() {
        let alphabet = ["a", "Z", "7", "-", " ", "!", ".", "é", "_"];
        for first in alphabet {
            for second in alphabet {
                for third in alphabet {
                    let name = format!("{first}{second}{third}");
                    assert_eq!(find_first_invalid_character_index(&name).is_none(), is_valid_name(&name), "{name}");
                }
            }
        }
    }

    #[test]
    fn test_name_bytes() {
        assert_eq!(name_to_bytes("alice"), b"alice".to_vec());
        assert_eq!(name_from_bytes(b"Alice").unwrap(), "Alice");
        assert!(matches!(name_from_bytes(&[0xff, 0xfe]), Err(Error::MalformedCommitment(_))));
    }

    #[test]
    fn test_registration_id() {
        assert_eq!(encode_registration_id(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(decode_registration_id(&[0, 0, 0, 0, 0, 0, 1, 0]).unwrap(), 256);
        assert!(decode_registration_id(&[1, 2, 3]).is_err());

        let commitment = identity_commitment(7, b"alice");
        assert_eq!(commitment.len(), 13);
        let (id, name) = split_identity_commitment(&commitment).unwrap();
        assert_eq!((id, name), (7, b"alice".as_slice()));
        assert!(split_identity_commitment(&encode_registration_id(7)).is_err());
    }

    #[test]
    fn test_addresses() {
        let address = Address::try_from("bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2").unwrap();
        let pkh = address_to_pkh(&address).unwrap();
        assert_eq!(faster_hex::hex_string(&pkh), "f5bf48b397dae70be82b3cca4793f8eb2b6cdac9");
        assert_eq!(address_to_pkh(&address.to_token_aware()).unwrap(), pkh);
        assert_eq!(pkh_to_address(&pkh, Prefix::Mainnet, false), address);
        assert_eq!(pkh_to_address(&pkh, Prefix::Mainnet, true), address.to_token_aware());

        let script_address = Address::new(Prefix::Mainnet, Version::P2sh32, &[1u8; 32]);
        assert!(matches!(address_to_pkh(&script_address), Err(Error::UnsupportedAddress(_))));

        let commitment = auction_commitment(&pkh, b"alice");
        let (bidder, name) = split_auction_commitment(&commitment).unwrap();
        assert_eq!(bidder, pkh);
        assert_eq!(name, b"alice");
        assert!(split_auction_commitment(&pkh).is_err());
    }

    #[test]
    fn test_script_fragments() {
        assert_eq!(pad_vm_number(3, 2).unwrap(), vec![3, 0]);
        assert_eq!(encode_vm_number(-5), vec![0x85]);

        let locking = p2sh32_locking_bytecode(&[0x51]);
        assert_eq!(locking.script()[0], 0xaa);
        assert_eq!(locking.script()[34], 0x87);

        let op_return = bitcann_txscript::null_data_script(&[b"ns.key=value".to_vec()]).unwrap();
        assert_eq!(extract_op_return_pushes(&op_return).unwrap(), vec![b"ns.key=value".to_vec()]);
        assert!(extract_op_return_pushes(&locking).is_err());
    }
}
