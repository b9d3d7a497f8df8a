use crate::serde_bytes::{from_hex, to_hex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// Inline capacity: a P2SH32 locking bytecode is 35 bytes, P2PKH is 25.
pub const SCRIPT_VECTOR_SIZE: usize = 36;

pub type ScriptVec = SmallVec<[u8; SCRIPT_VECTOR_SIZE]>;

/// The script an output is locked with, excluding any token prefix.
/// Immutable once built.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct LockingBytecode {
    script: ScriptVec,
}

impl LockingBytecode {
    pub fn new(script: ScriptVec) -> Self {
        Self { script }
    }

    pub fn from_vec(script: Vec<u8>) -> Self {
        Self { script: ScriptVec::from_vec(script) }
    }

    pub fn from_slice(script: &[u8]) -> Self {
        Self { script: ScriptVec::from_slice(script) }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.script)
    }
}

impl AsRef<[u8]> for LockingBytecode {
    fn as_ref(&self) -> &[u8] {
        &self.script
    }
}

impl From<Vec<u8>> for LockingBytecode {
    fn from(script: Vec<u8>) -> Self {
        Self::from_vec(script)
    }
}

impl Debug for LockingBytecode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LockingBytecode").field(&self.to_hex()).finish()
    }
}

impl Display for LockingBytecode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for LockingBytecode {
    type Err = faster_hex::Error;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        from_hex(hex_str).map(Self::from_vec)
    }
}

impl Serialize for LockingBytecode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        crate::serde_bytes::serialize(self.script.as_slice(), serializer)
    }
}

impl<'de> Deserialize<'de> for LockingBytecode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::serde_bytes::deserialize::<Vec<u8>, D>(deserializer).map(Self::from_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locking_bytecode_hex() {
        // OP_HASH256 <32 bytes> OP_EQUAL
        let mut script = vec![0xaa, 0x20];
        script.extend([0x11; 32]);
        script.push(0x87);
        let locking = LockingBytecode::from_vec(script.clone());
        assert_eq!(locking.len(), 35);

        let json = serde_json::to_string(&locking).unwrap();
        assert_eq!(json, format!("\"aa20{}87\"", "11".repeat(32)));
        assert_eq!(serde_json::from_str::<LockingBytecode>(&json).unwrap().script(), script.as_slice());
        assert_eq!(locking.to_string().parse::<LockingBytecode>().unwrap(), locking);

        assert!(matches!("0".parse::<LockingBytecode>(), Err(faster_hex::Error::InvalidLength(1))));
        assert!("".parse::<LockingBytecode>().unwrap().is_empty());
    }
}
