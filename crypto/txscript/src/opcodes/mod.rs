#[macro_use]
mod macros;

use crate::TxScriptError;
use codes::*;
use itertools::Itertools;
use std::fmt::{Debug, Formatter};

/// First value in the range formed by the "small integer" Op# opcodes
pub const OP_SMALL_INT_MIN_VAL: u8 = 1;
/// Last value in the range formed by the "small integer" Op# opcodes
pub const OP_SMALL_INT_MAX_VAL: u8 = 16;
/// First value in the range formed by OpData# opcodes (where opcode == value)
pub const OP_DATA_MIN_VAL: u8 = self::codes::OpData1;
/// Last value in the range formed by OpData# opcodes (where opcode == value)
pub const OP_DATA_MAX_VAL: u8 = self::codes::OpData75;
/// Minus 1 value
pub const OP_1_NEGATE_VAL: u8 = 0x81;

/// A single opcode of a parsed script, with the data it pushes inline (if any).
#[derive(Clone, PartialEq, Eq)]
pub struct ParsedOpcode {
    pub value: u8,
    pub data: Vec<u8>,
}

impl ParsedOpcode {
    pub fn is_push_opcode(&self) -> bool {
        self.value <= Op16 && self.value != OpReserved
    }

    /// The stack element this opcode pushes, or `None` for non-push opcodes.
    pub fn pushed_data(&self) -> Option<Vec<u8>> {
        match self.value {
            OpFalse => Some(vec![]),
            OpData1..=OpData75 | OpPushData1 | OpPushData2 | OpPushData4 => Some(self.data.clone()),
            Op1Negate => Some(vec![OP_1_NEGATE_VAL]),
            OpTrue..=Op16 => Some(vec![self.value - (OpTrue - 1)]),
            _ => None,
        }
    }
}

impl Debug for ParsedOpcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = opcode_name(self.value).unwrap_or("OpUnknown");
        if self.data.is_empty() { write!(f, "{name}") } else { write!(f, "{name} 0x{}", faster_hex::hex_string(&self.data)) }
    }
}

/// Parses a script into its opcodes. Iteration yields an error for a truncated push.
pub fn parse_script(script: &[u8]) -> impl Iterator<Item = Result<ParsedOpcode, TxScriptError>> + '_ {
    script.iter().batching(|it| deserialize_next_opcode(it))
}

fn read_push_length<'i, I: Iterator<Item = &'i u8>>(it: &mut I, size: usize) -> Result<usize, TxScriptError> {
    let bytes: Vec<u8> = it.take(size).copied().collect();
    if bytes.len() != size {
        return Err(TxScriptError::MalformedPushSize(bytes));
    }
    Ok(bytes.iter().rev().fold(0usize, |length, byte| (length << 8) | *byte as usize))
}

fn deserialize_next_opcode<'i, I: Iterator<Item = &'i u8>>(it: &mut I) -> Option<Result<ParsedOpcode, TxScriptError>> {
    let value = *it.next()?;
    let length = match value {
        OpData1..=OpData75 => Ok(value as usize),
        OpPushData1 => read_push_length(it, 1),
        OpPushData2 => read_push_length(it, 2),
        OpPushData4 => read_push_length(it, 4),
        _ => Ok(0),
    };
    let length = match length {
        Ok(length) => length,
        Err(err) => return Some(Err(err)),
    };
    let data: Vec<u8> = it.take(length).copied().collect();
    if data.len() != length {
        return Some(Err(TxScriptError::MalformedPush(length, data.len())));
    }
    Some(Ok(ParsedOpcode { value, data }))
}

opcode_list! {
    opcode OpFalse<0x00>
    opcode OpData1<0x01>
    opcode OpData2<0x02>
    opcode OpData3<0x03>
    opcode OpData4<0x04>
    opcode OpData5<0x05>
    opcode OpData6<0x06>
    opcode OpData7<0x07>
    opcode OpData8<0x08>
    opcode OpData9<0x09>
    opcode OpData10<0x0a>
    opcode OpData11<0x0b>
    opcode OpData12<0x0c>
    opcode OpData13<0x0d>
    opcode OpData14<0x0e>
    opcode OpData15<0x0f>
    opcode OpData16<0x10>
    opcode OpData17<0x11>
    opcode OpData18<0x12>
    opcode OpData19<0x13>
    opcode OpData20<0x14>
    opcode OpData21<0x15>
    opcode OpData22<0x16>
    opcode OpData23<0x17>
    opcode OpData24<0x18>
    opcode OpData25<0x19>
    opcode OpData26<0x1a>
    opcode OpData27<0x1b>
    opcode OpData28<0x1c>
    opcode OpData29<0x1d>
    opcode OpData30<0x1e>
    opcode OpData31<0x1f>
    opcode OpData32<0x20>
    opcode OpData33<0x21>
    opcode OpData34<0x22>
    opcode OpData35<0x23>
    opcode OpData36<0x24>
    opcode OpData37<0x25>
    opcode OpData38<0x26>
    opcode OpData39<0x27>
    opcode OpData40<0x28>
    opcode OpData41<0x29>
    opcode OpData42<0x2a>
    opcode OpData43<0x2b>
    opcode OpData44<0x2c>
    opcode OpData45<0x2d>
    opcode OpData46<0x2e>
    opcode OpData47<0x2f>
    opcode OpData48<0x30>
    opcode OpData49<0x31>
    opcode OpData50<0x32>
    opcode OpData51<0x33>
    opcode OpData52<0x34>
    opcode OpData53<0x35>
    opcode OpData54<0x36>
    opcode OpData55<0x37>
    opcode OpData56<0x38>
    opcode OpData57<0x39>
    opcode OpData58<0x3a>
    opcode OpData59<0x3b>
    opcode OpData60<0x3c>
    opcode OpData61<0x3d>
    opcode OpData62<0x3e>
    opcode OpData63<0x3f>
    opcode OpData64<0x40>
    opcode OpData65<0x41>
    opcode OpData66<0x42>
    opcode OpData67<0x43>
    opcode OpData68<0x44>
    opcode OpData69<0x45>
    opcode OpData70<0x46>
    opcode OpData71<0x47>
    opcode OpData72<0x48>
    opcode OpData73<0x49>
    opcode OpData74<0x4a>
    opcode OpData75<0x4b>
    opcode OpPushData1<0x4c>
    opcode OpPushData2<0x4d>
    opcode OpPushData4<0x4e>
    opcode Op1Negate<0x4f>
    opcode OpReserved<0x50>
    opcode OpTrue<0x51>
    opcode Op2<0x52>
    opcode Op3<0x53>
    opcode Op4<0x54>
    opcode Op5<0x55>
    opcode Op6<0x56>
    opcode Op7<0x57>
    opcode Op8<0x58>
    opcode Op9<0x59>
    opcode Op10<0x5a>
    opcode Op11<0x5b>
    opcode Op12<0x5c>
    opcode Op13<0x5d>
    opcode Op14<0x5e>
    opcode Op15<0x5f>
    opcode Op16<0x60>
    opcode OpNop<0x61>
    opcode OpVer<0x62>
    opcode OpIf<0x63>
    opcode OpNotIf<0x64>
    opcode OpVerIf<0x65>
    opcode OpVerNotIf<0x66>
    opcode OpElse<0x67>
    opcode OpEndIf<0x68>
    opcode OpVerify<0x69>
    opcode OpReturn<0x6a>
    opcode OpToAltStack<0x6b>
    opcode OpFromAltStack<0x6c>
    opcode Op2Drop<0x6d>
    opcode Op2Dup<0x6e>
    opcode Op3Dup<0x6f>
    opcode Op2Over<0x70>
    opcode Op2Rot<0x71>
    opcode Op2Swap<0x72>
    opcode OpIfDup<0x73>
    opcode OpDepth<0x74>
    opcode OpDrop<0x75>
    opcode OpDup<0x76>
    opcode OpNip<0x77>
    opcode OpOver<0x78>
    opcode OpPick<0x79>
    opcode OpRoll<0x7a>
    opcode OpRot<0x7b>
    opcode OpSwap<0x7c>
    opcode OpTuck<0x7d>
    opcode OpCat<0x7e>
    opcode OpSplit<0x7f>
    opcode OpNum2Bin<0x80>
    opcode OpBin2Num<0x81>
    opcode OpSize<0x82>
    opcode OpInvert<0x83>
    opcode OpAnd<0x84>
    opcode OpOr<0x85>
    opcode OpXor<0x86>
    opcode OpEqual<0x87>
    opcode OpEqualVerify<0x88>
    opcode OpReserved1<0x89>
    opcode OpReserved2<0x8a>
    opcode Op1Add<0x8b>
    opcode Op1Sub<0x8c>
    opcode Op2Mul<0x8d>
    opcode Op2Div<0x8e>
    opcode OpNegate<0x8f>
    opcode OpAbs<0x90>
    opcode OpNot<0x91>
    opcode Op0NotEqual<0x92>
    opcode OpAdd<0x93>
    opcode OpSub<0x94>
    opcode OpMul<0x95>
    opcode OpDiv<0x96>
    opcode OpMod<0x97>
    opcode OpLShift<0x98>
    opcode OpRShift<0x99>
    opcode OpBoolAnd<0x9a>
    opcode OpBoolOr<0x9b>
    opcode OpNumEqual<0x9c>
    opcode OpNumEqualVerify<0x9d>
    opcode OpNumNotEqual<0x9e>
    opcode OpLessThan<0x9f>
    opcode OpGreaterThan<0xa0>
    opcode OpLessThanOrEqual<0xa1>
    opcode OpGreaterThanOrEqual<0xa2>
    opcode OpMin<0xa3>
    opcode OpMax<0xa4>
    opcode OpWithin<0xa5>
    opcode OpRipemd160<0xa6>
    opcode OpSha1<0xa7>
    opcode OpSha256<0xa8>
    opcode OpHash160<0xa9>
    opcode OpHash256<0xaa>
    opcode OpCodeSeparator<0xab>
    opcode OpCheckSig<0xac>
    opcode OpCheckSigVerify<0xad>
    opcode OpCheckMultiSig<0xae>
    opcode OpCheckMultiSigVerify<0xaf>
    opcode OpNop1<0xb0>
    opcode OpCheckLockTimeVerify<0xb1>
    opcode OpCheckSequenceVerify<0xb2>
    opcode OpNop4<0xb3>
    opcode OpNop5<0xb4>
    opcode OpNop6<0xb5>
    opcode OpNop7<0xb6>
    opcode OpNop8<0xb7>
    opcode OpNop9<0xb8>
    opcode OpNop10<0xb9>
    opcode OpCheckDataSig<0xba>
    opcode OpCheckDataSigVerify<0xbb>
    opcode OpReverseBytes<0xbc>
    opcode OpInputIndex<0xc0>
    opcode OpActiveBytecode<0xc1>
    opcode OpTxVersion<0xc2>
    opcode OpTxInputCount<0xc3>
    opcode OpTxOutputCount<0xc4>
    opcode OpTxLockTime<0xc5>
    opcode OpUtxoValue<0xc6>
    opcode OpUtxoBytecode<0xc7>
    opcode OpOutpointTxHash<0xc8>
    opcode OpOutpointIndex<0xc9>
    opcode OpInputBytecode<0xca>
    opcode OpInputSequenceNumber<0xcb>
    opcode OpOutputValue<0xcc>
    opcode OpOutputBytecode<0xcd>
    opcode OpUtxoTokenCategory<0xce>
    opcode OpUtxoTokenCommitment<0xcf>
    opcode OpUtxoTokenAmount<0xd0>
    opcode OpOutputTokenCategory<0xd1>
    opcode OpOutputTokenCommitment<0xd2>
    opcode OpOutputTokenAmount<0xd3>
}
