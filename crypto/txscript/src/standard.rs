use crate::{
    TxScriptError,
    opcodes::{
        codes::{OpCheckSig, OpData20, OpData32, OpData33, OpData65, OpDup, OpEqual, OpEqualVerify, OpHash160, OpHash256, OpReturn},
        parse_script,
    },
    script_builder::{ScriptBuilder, ScriptBuilderResult},
    script_class::ScriptClass,
};
use bitcann_addresses::{Address, Prefix, Version};
use bitcann_consensus_core::tx::{LockingBytecode, ScriptVec};
use bitcann_hashes::{HASH160_SIZE, HASH_SIZE, hash256};
use smallvec::SmallVec;
use std::iter::once;

/// Size of a signature in a P2PKH unlocking bytecode: a 64-byte Schnorr
/// signature followed by the sighash type byte.
pub const SIGNATURE_SIZE: usize = 65;
/// Size of a compressed public key.
pub const PUBLIC_KEY_SIZE: usize = 33;
/// Size of a P2PKH unlocking bytecode: `<signature> <public key>`.
pub const P2PKH_UNLOCKING_SIZE: usize = 1 + SIGNATURE_SIZE + 1 + PUBLIC_KEY_SIZE;

fn pay_to_pub_key_hash(pub_key_hash: &[u8]) -> ScriptVec {
    debug_assert_eq!(pub_key_hash.len(), HASH160_SIZE);
    SmallVec::from_iter(
        [OpDup, OpHash160, OpData20]
            .into_iter()
            .chain(pub_key_hash.iter().copied())
            .chain([OpEqualVerify, OpCheckSig]),
    )
}

fn pay_to_script_hash20(script_hash: &[u8]) -> ScriptVec {
    debug_assert_eq!(script_hash.len(), HASH160_SIZE);
    SmallVec::from_iter([OpHash160, OpData20].into_iter().chain(script_hash.iter().copied()).chain(once(OpEqual)))
}

fn pay_to_script_hash32(script_hash: &[u8]) -> ScriptVec {
    debug_assert_eq!(script_hash.len(), HASH_SIZE);
    SmallVec::from_iter([OpHash256, OpData32].into_iter().chain(script_hash.iter().copied()).chain(once(OpEqual)))
}

/// Creates the locking bytecode paying to the specified address. Token-aware
/// and plain forms of an address produce the same bytecode.
pub fn pay_to_address_script(address: &Address) -> LockingBytecode {
    let script = match ScriptClass::from(address.version) {
        ScriptClass::ScriptHash20 => pay_to_script_hash20(address.payload.as_slice()),
        ScriptClass::ScriptHash32 => pay_to_script_hash32(address.payload.as_slice()),
        _ => pay_to_pub_key_hash(address.payload.as_slice()),
    };
    LockingBytecode::new(script)
}

/// Takes a redeem script and returns the P2SH32 locking bytecode committing to it.
pub fn pay_to_script_hash_script(redeem_script: &[u8]) -> LockingBytecode {
    LockingBytecode::new(pay_to_script_hash32(hash256(redeem_script).as_bytes()))
}

/// Generates an unlocking bytecode for a P2SH output: the already encoded
/// argument pushes followed by a push of the redeem script.
pub fn pay_to_script_hash_signature_script(redeem_script: Vec<u8>, arguments: Vec<u8>) -> ScriptBuilderResult<Vec<u8>> {
    let redeem_script_as_data = ScriptBuilder::new().add_data(&redeem_script)?.drain();
    Ok(Vec::from_iter(arguments.iter().copied().chain(redeem_script_as_data.iter().copied())))
}

/// An unlocking bytecode with the exact shape of a P2PKH spend, all zeros.
/// Used to size transactions before the wallet signs them.
pub fn pay_to_pub_key_hash_placeholder() -> Vec<u8> {
    once(OpData65)
        .chain([0u8; SIGNATURE_SIZE])
        .chain(once(OpData33))
        .chain([0u8; PUBLIC_KEY_SIZE])
        .collect()
}

/// Returns the address a standard locking bytecode pays to.
///
/// Only P2PKH, P2SH20 and P2SH32 have an address; anything else yields
/// [`TxScriptError::PubKeyFormat`]. The address is returned in its plain form,
/// call [`Address::to_token_aware`] where needed.
pub fn extract_script_pub_key_address(locking_bytecode: &LockingBytecode, prefix: Prefix) -> Result<Address, TxScriptError> {
    let script = locking_bytecode.script();
    match ScriptClass::from_script(script) {
        ScriptClass::PubKeyHash => Ok(Address::try_new(prefix, Version::P2pkh, &script[3..23])?),
        ScriptClass::ScriptHash20 => Ok(Address::try_new(prefix, Version::P2sh20, &script[2..22])?),
        ScriptClass::ScriptHash32 => Ok(Address::try_new(prefix, Version::P2sh32, &script[2..34])?),
        ScriptClass::NonStandard | ScriptClass::NullData => Err(TxScriptError::PubKeyFormat),
    }
}

/// Builds an `OP_RETURN <push>...` data carrier.
pub fn null_data_script<T: AsRef<[u8]>>(pushes: &[T]) -> ScriptBuilderResult<LockingBytecode> {
    let mut builder = ScriptBuilder::new();
    builder.add_op(OpReturn)?;
    for push in pushes {
        builder.add_data(push.as_ref())?;
    }
    Ok(LockingBytecode::from_vec(builder.drain()))
}

/// Returns the elements pushed after the leading `OP_RETURN` of a data carrier.
/// Every opcode after `OP_RETURN` must be a push.
pub fn extract_null_data_pushes(script: &[u8]) -> Result<Vec<Vec<u8>>, TxScriptError> {
    if script.first() != Some(&OpReturn) {
        return Err(TxScriptError::NotNullData);
    }
    parse_script(&script[1..])
        .map(|opcode| {
            let opcode = opcode?;
            opcode.pushed_data().ok_or(TxScriptError::NotPushOnly(opcode.value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::codes::{OpData4, OpPushData1, OpTrue};
    use hex_literal::hex;

    #[test]
    fn test_pay_to_address_script() {
        let address = Address::try_from("bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2").unwrap();
        let script = pay_to_address_script(&address);
        assert_eq!(script.script(), hex!("76a914f5bf48b397dae70be82b3cca4793f8eb2b6cdac988ac"));
        assert_eq!(pay_to_address_script(&address.to_token_aware()), script);
        assert_eq!(extract_script_pub_key_address(&script, Prefix::Mainnet).unwrap(), address);

        let address = Address::new(Prefix::Testnet, Version::P2sh20, &hex!("f5bf48b397dae70be82b3cca4793f8eb2b6cdac9"));
        let script = pay_to_address_script(&address);
        assert_eq!(script.script(), hex!("a914f5bf48b397dae70be82b3cca4793f8eb2b6cdac987"));
        assert_eq!(extract_script_pub_key_address(&script, Prefix::Testnet).unwrap(), address);
    }

    #[test]
    fn test_pay_to_script_hash_script() {
        let redeem_script = vec![OpTrue];
        let locking = pay_to_script_hash_script(&redeem_script);
        assert_eq!(locking.len(), 35);
        assert_eq!(&locking.script()[2..34], hash256(&redeem_script).as_bytes());
        assert_eq!(ScriptClass::from_script(locking.script()), ScriptClass::ScriptHash32);

        let address = extract_script_pub_key_address(&locking, Prefix::Mainnet).unwrap();
        assert_eq!(address.version, Version::P2sh32);
        assert_eq!(pay_to_address_script(&address.to_token_aware()), locking);

        let unlocking = pay_to_script_hash_signature_script(redeem_script, vec![OpData4, 1, 2, 3, 4]).unwrap();
        assert_eq!(unlocking, vec![OpData4, 1, 2, 3, 4, OpTrue]);
    }

    #[test]
    fn test_placeholder() {
        let placeholder = pay_to_pub_key_hash_placeholder();
        assert_eq!(placeholder.len(), P2PKH_UNLOCKING_SIZE);
        assert_eq!(placeholder.len(), 100);
        assert_eq!(placeholder[0], OpData65);
        assert_eq!(placeholder[66], OpData33);
    }

    #[test]
    fn test_null_data() {
        let script = null_data_script(&[b"bitcann".to_vec(), vec![0x42; 80]]).unwrap();
        assert_eq!(script.script()[0], OpReturn);
        assert_eq!(script.script()[9], OpPushData1);
        let pushes = extract_null_data_pushes(script.script()).unwrap();
        assert_eq!(pushes, vec![b"bitcann".to_vec(), vec![0x42; 80]]);

        assert_eq!(extract_null_data_pushes(&[OpTrue]), Err(TxScriptError::NotNullData));
        assert_eq!(extract_null_data_pushes(&[OpReturn, OpCheckSig]), Err(TxScriptError::NotPushOnly(OpCheckSig)));
        assert_eq!(extract_null_data_pushes(&[OpReturn, OpData4, 1]), Err(TxScriptError::MalformedPush(4, 1)));
        assert_eq!(extract_null_data_pushes(&[OpReturn]), Ok(vec![]));
        assert_eq!(ScriptClass::from_script(script.script()), ScriptClass::NullData);
    }

    #[test]
    fn test_extract_non_standard() {
        let script = LockingBytecode::from_slice(&[OpTrue]);
        assert_eq!(extract_script_pub_key_address(&script, Prefix::Mainnet), Err(TxScriptError::PubKeyFormat));
    }
}
