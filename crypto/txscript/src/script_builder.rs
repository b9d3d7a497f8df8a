use crate::{
    MAX_SCRIPT_ELEMENT_SIZE, MAX_SCRIPTS_SIZE,
    opcodes::{OP_1_NEGATE_VAL, OP_DATA_MAX_VAL, codes::*},
    vm_number::encode_vm_number,
};
use hexplay::HexViewBuilder;
use smallvec::{SmallVec, smallvec};
use std::fmt::{Debug, Formatter};
use thiserror::Error;

/// Initial capacity of the script buffer. Unlocking bytecodes that carry a
/// contract redeem script are the largest this crate builds.
const DEFAULT_SCRIPT_ALLOC: usize = 512;

#[derive(Error, PartialEq, Eq, Debug, Clone, Copy)]
pub enum ScriptBuilderError {
    #[error("script of {0} bytes would exceed the maximum script size of {MAX_SCRIPTS_SIZE}")]
    ScriptTooLong(usize),

    #[error("data element of {0} bytes exceeds the maximum element size of {MAX_SCRIPT_ELEMENT_SIZE}")]
    ElementTooLarge(usize),
}
pub type ScriptBuilderResult<T> = std::result::Result<T, ScriptBuilderError>;

/// The single opcode pushing `data`, if the minimal-push rules require one:
/// the empty element, the numbers 1 to 16 and -1.
fn minimal_push_opcode(data: &[u8]) -> Option<u8> {
    match data {
        [] => Some(Op0),
        [n @ 1..=16] => Some(Op1 - 1 + *n),
        [OP_1_NEGATE_VAL] => Some(Op1Negate),
        _ => None,
    }
}

/// Opcode and length bytes announcing a data push of `len` bytes.
fn push_prefix(len: usize) -> SmallVec<[u8; 5]> {
    if len <= OP_DATA_MAX_VAL as usize {
        smallvec![len as u8]
    } else if len <= u8::MAX as usize {
        smallvec![OpPushData1, len as u8]
    } else if len <= u16::MAX as usize {
        let mut prefix = smallvec![OpPushData2];
        prefix.extend((len as u16).to_le_bytes());
        prefix
    } else {
        let mut prefix = smallvec![OpPushData4];
        prefix.extend((len as u32).to_le_bytes());
        prefix
    }
}

/// Size of the minimal push of `data`.
pub fn push_size(data: &[u8]) -> usize {
    match minimal_push_opcode(data) {
        Some(_) => 1,
        None => push_prefix(data.len()).len() + data.len(),
    }
}

/// Builds locking and unlocking bytecode with minimal pushes, the encoding
/// the BCH VM enforces for every push in a standard transaction. Pushes that
/// would break the VM size limits are refused and leave the script as it was.
///
/// A pay-to-public-key-hash locking bytecode:
///
/// ```
/// use bitcann_txscript::opcodes::codes::*;
/// use bitcann_txscript::script_builder::{ScriptBuilderResult, ScriptBuilder};
/// fn build_p2pkh(pub_key_hash: &[u8; 20]) -> ScriptBuilderResult<Vec<u8>> {
///     Ok(ScriptBuilder::new()
///         .add_op(OpDup)?
///         .add_op(OpHash160)?
///         .add_data(pub_key_hash)?
///         .add_op(OpEqualVerify)?
///         .add_op(OpCheckSig)?
///         .drain())
/// }
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self { script: Vec::with_capacity(DEFAULT_SCRIPT_ALLOC) }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn drain(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.script)
    }

    fn ensure_room(&self, additional: usize) -> ScriptBuilderResult<()> {
        let size = self.script.len() + additional;
        if size > MAX_SCRIPTS_SIZE { Err(ScriptBuilderError::ScriptTooLong(size)) } else { Ok(()) }
    }

    pub fn add_op(&mut self, opcode: u8) -> ScriptBuilderResult<&mut Self> {
        self.ensure_room(1)?;
        self.script.push(opcode);
        Ok(self)
    }

    /// Appends already encoded bytecode verbatim, e.g. the body of a contract
    /// following its constructor arguments.
    pub fn add_bytecode(&mut self, bytecode: &[u8]) -> ScriptBuilderResult<&mut Self> {
        self.ensure_room(bytecode.len())?;
        self.script.extend_from_slice(bytecode);
        Ok(self)
    }

    pub fn add_data(&mut self, data: &[u8]) -> ScriptBuilderResult<&mut Self> {
        if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptBuilderError::ElementTooLarge(data.len()));
        }
        self.ensure_room(push_size(data))?;
        match minimal_push_opcode(data) {
            Some(opcode) => self.script.push(opcode),
            None => {
                self.script.extend(push_prefix(data.len()));
                self.script.extend_from_slice(data);
            }
        }
        Ok(self)
    }

    /// Pushes `value` as a VM number. Zero, -1 and 1 to 16 become their
    /// dedicated opcodes.
    pub fn add_i64(&mut self, value: i64) -> ScriptBuilderResult<&mut Self> {
        self.add_data(&encode_vm_number(value))
    }
}

impl Debug for ScriptBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", HexViewBuilder::new(&self.script).row_width(16).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::{once, repeat_n};

    #[test]
    fn test_add_op() {
        let script = ScriptBuilder::new().add_op(OpInputIndex).unwrap().add_op(OpUtxoTokenCategory).unwrap().drain();
        assert_eq!(script, vec![0xc0, 0xce]);
        let script = ScriptBuilder::new().add_op(OpHash256).unwrap().add_bytecode(&[OpData1, 7, OpEqual]).unwrap().drain();
        assert_eq!(script, vec![0xaa, 0x01, 0x07, 0x87]);
    }

    #[test]
    fn test_add_i64() {
        let tests: Vec<(i64, Vec<u8>)> = vec![
            (-1, vec![Op1Negate]),
            (0, vec![Op0]),
            (1, vec![Op1]),
            (16, vec![Op16]),
            (17, vec![OpData1, 0x11]),
            (127, vec![OpData1, 0x7f]),
            (128, vec![OpData2, 0x80, 0]),
            (144, vec![OpData2, 0x90, 0]),
            (100_000, vec![OpData3, 0xa0, 0x86, 0x01]),
            (-2, vec![OpData1, 0x82]),
            (-32768, vec![OpData3, 0x00, 0x80, 0x80]),
        ];
        for (value, expected) in tests {
            assert_eq!(ScriptBuilder::new().add_i64(value).unwrap().drain(), expected, "push {value}");
        }
    }

    #[test]
    fn test_add_data() {
        let tests: Vec<(Vec<u8>, Vec<u8>)> = vec![
            (vec![], vec![Op0]),
            // a zero byte is not the empty element
            (vec![0x00], vec![OpData1, 0x00]),
            (vec![0x05], vec![Op5]),
            (vec![0x81], vec![Op1Negate]),
            (vec![0x80], vec![OpData1, 0x80]),
            (vec![0x49; 75], once(OpData75).chain(repeat_n(0x49, 75)).collect()),
            (vec![0x49; 76], [OpPushData1, 76].into_iter().chain(repeat_n(0x49, 76)).collect()),
            (vec![0x49; 520], [OpPushData2, 8, 2].into_iter().chain(repeat_n(0x49, 520)).collect()),
        ];
        for (data, expected) in tests {
            assert_eq!(push_size(&data), expected.len());
            assert_eq!(ScriptBuilder::new().add_data(&data).unwrap().drain(), expected, "push of {} bytes", data.len());
        }
        assert_eq!(ScriptBuilder::new().add_data(&[0; 10_001]).map(|_| ()), Err(ScriptBuilderError::ElementTooLarge(10_001)));
    }

    #[test]
    fn test_exceed_max_script_size() {
        let mut builder = ScriptBuilder::new();
        builder.add_bytecode(&[0u8; MAX_SCRIPTS_SIZE - 1]).unwrap();
        builder.add_op(OpDrop).unwrap();
        let full = builder.script().to_vec();

        assert_eq!(builder.add_op(OpDrop).map(|_| ()), Err(ScriptBuilderError::ScriptTooLong(MAX_SCRIPTS_SIZE + 1)));
        assert_eq!(builder.add_data(&[0x42, 0x43]).map(|_| ()), Err(ScriptBuilderError::ScriptTooLong(MAX_SCRIPTS_SIZE + 3)));
        assert_eq!(builder.add_i64(0).map(|_| ()), Err(ScriptBuilderError::ScriptTooLong(MAX_SCRIPTS_SIZE + 1)));
        assert_eq!(builder.script(), &full[..]);
        assert!(!format!("{builder:?}").is_empty());
    }
}
