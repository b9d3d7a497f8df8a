use crate::opcodes::codes::{OpCheckSig, OpData20, OpData32, OpDup, OpEqual, OpEqualVerify, OpHash160, OpHash256, OpReturn};
use bitcann_addresses::Version;
use std::fmt::{Display, Formatter};

/// Standard classes of locking bytecode.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum ScriptClass {
    /// None of the recognized forms.
    NonStandard,
    /// Pay to public key hash.
    PubKeyHash,
    /// Pay to 20-byte script hash.
    ScriptHash20,
    /// Pay to 32-byte script hash.
    ScriptHash32,
    /// Provably unspendable data carrier.
    NullData,
}

const NON_STANDARD: &str = "nonstandard";
const PUB_KEY_HASH: &str = "pubkeyhash";
const SCRIPT_HASH_20: &str = "scripthash";
const SCRIPT_HASH_32: &str = "scripthash32";
const NULL_DATA: &str = "nulldata";

impl ScriptClass {
    pub fn from_script(script: &[u8]) -> Self {
        if is_pay_to_pub_key_hash(script) {
            ScriptClass::PubKeyHash
        } else if is_pay_to_script_hash20(script) {
            ScriptClass::ScriptHash20
        } else if is_pay_to_script_hash32(script) {
            ScriptClass::ScriptHash32
        } else if script.first() == Some(&OpReturn) {
            ScriptClass::NullData
        } else {
            ScriptClass::NonStandard
        }
    }

    /// Address version of a plain (non token-aware) address locking to this class.
    pub fn address_version(&self) -> Option<Version> {
        match self {
            ScriptClass::PubKeyHash => Some(Version::P2pkh),
            ScriptClass::ScriptHash20 => Some(Version::P2sh20),
            ScriptClass::ScriptHash32 => Some(Version::P2sh32),
            ScriptClass::NonStandard | ScriptClass::NullData => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ScriptClass::NonStandard => NON_STANDARD,
            ScriptClass::PubKeyHash => PUB_KEY_HASH,
            ScriptClass::ScriptHash20 => SCRIPT_HASH_20,
            ScriptClass::ScriptHash32 => SCRIPT_HASH_32,
            ScriptClass::NullData => NULL_DATA,
        }
    }
}

impl Display for ScriptClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Version> for ScriptClass {
    fn from(version: Version) -> Self {
        match version.to_plain() {
            Version::P2sh20 => ScriptClass::ScriptHash20,
            Version::P2sh32 => ScriptClass::ScriptHash32,
            _ => ScriptClass::PubKeyHash,
        }
    }
}

#[inline(always)]
fn is_pay_to_pub_key_hash(script: &[u8]) -> bool {
    script.len() == 25
        && script[0] == OpDup
        && script[1] == OpHash160
        && script[2] == OpData20
        && script[23] == OpEqualVerify
        && script[24] == OpCheckSig
}

#[inline(always)]
fn is_pay_to_script_hash20(script: &[u8]) -> bool {
    script.len() == 23 && script[0] == OpHash160 && script[1] == OpData20 && script[22] == OpEqual
}

#[inline(always)]
fn is_pay_to_script_hash32(script: &[u8]) -> bool {
    script.len() == 35 && script[0] == OpHash256 && script[1] == OpData32 && script[34] == OpEqual
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_script() {
        let mut p2pkh = vec![OpDup, OpHash160, OpData20];
        p2pkh.extend([0u8; 20]);
        p2pkh.extend([OpEqualVerify, OpCheckSig]);
        assert_eq!(ScriptClass::from_script(&p2pkh), ScriptClass::PubKeyHash);

        let mut p2sh20 = vec![OpHash160, OpData20];
        p2sh20.extend([0u8; 20]);
        p2sh20.push(OpEqual);
        assert_eq!(ScriptClass::from_script(&p2sh20), ScriptClass::ScriptHash20);

        let mut p2sh32 = vec![OpHash256, OpData32];
        p2sh32.extend([0u8; 32]);
        p2sh32.push(OpEqual);
        assert_eq!(ScriptClass::from_script(&p2sh32), ScriptClass::ScriptHash32);
        assert_eq!(ScriptClass::from_script(&p2sh32[..34]), ScriptClass::NonStandard);

        assert_eq!(ScriptClass::from_script(&[OpReturn, 0x01, 0x02]), ScriptClass::NullData);
        assert_eq!(ScriptClass::from_script(&[]), ScriptClass::NonStandard);
        assert_eq!(ScriptClass::NullData.to_string(), "nulldata");
    }
}
