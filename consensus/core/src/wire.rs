//!
//! Decoding of transactions from the network wire format.
//!

use crate::{
    constants::{MAX_COMMITMENT_LENGTH, MAX_TOKEN_AMOUNT},
    errors::{DecodeError, DecodeResult},
    tx::*,
};
use bitcann_hashes::{HASH_SIZE, Hash};

/// A cursor over serialized transaction bytes.
pub struct WireReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn read_bytes(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEnd { needed: len, remaining: self.remaining() });
        }
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_hash(&mut self) -> DecodeResult<Hash> {
        Ok(Hash::from_bytes(self.read_array::<HASH_SIZE>()?))
    }

    /// Reads a minimally encoded compact size integer.
    pub fn read_compact_size(&mut self) -> DecodeResult<u64> {
        let (value, minimum) = match self.read_u8()? {
            0xfd => (self.read_u16()? as u64, 0xfd),
            0xfe => (self.read_u32()? as u64, 0x1_0000),
            0xff => (self.read_u64()?, 0x1_0000_0000),
            small => return Ok(small as u64),
        };
        if value < minimum {
            return Err(DecodeError::NonMinimalCompactSize(value));
        }
        Ok(value)
    }

    pub fn read_length(&mut self) -> DecodeResult<usize> {
        let length = self.read_compact_size()?;
        usize::try_from(length).map_err(|_| DecodeError::LengthOverflow(length))
    }

    pub fn read_var_bytes(&mut self) -> DecodeResult<&'a [u8]> {
        let length = self.read_length()?;
        self.read_bytes(length)
    }
}

pub fn deserialize_transaction(bytes: &[u8]) -> DecodeResult<Transaction> {
    let mut reader = WireReader::new(bytes);
    let tx = read_transaction(&mut reader)?;
    match reader.remaining() {
        0 => Ok(tx),
        trailing => Err(DecodeError::TrailingBytes(trailing)),
    }
}

pub fn read_transaction(reader: &mut WireReader<'_>) -> DecodeResult<Transaction> {
    let version = reader.read_u32()?;

    let input_count = reader.read_length()?;
    // Every input takes at least 41 bytes, which bounds the preallocation.
    let mut inputs = Vec::with_capacity(input_count.min(reader.remaining() / 41));
    for _ in 0..input_count {
        let previous_outpoint = TransactionOutpoint::new(reader.read_hash()?, reader.read_u32()?);
        let unlocking_bytecode = reader.read_var_bytes()?.to_vec();
        let sequence = reader.read_u32()?;
        inputs.push(TransactionInput::new(previous_outpoint, unlocking_bytecode, sequence));
    }

    let output_count = reader.read_length()?;
    let mut outputs = Vec::with_capacity(output_count.min(reader.remaining() / 9));
    for _ in 0..output_count {
        outputs.push(read_output(reader)?);
    }

    let lock_time = reader.read_u32()?;
    Ok(Transaction::new(version, inputs, outputs, lock_time))
}

pub fn read_output(reader: &mut WireReader<'_>) -> DecodeResult<TransactionOutput> {
    let value = reader.read_u64()?;
    let field = reader.read_var_bytes()?;
    match field.first() {
        Some(&PREFIX_TOKEN) => {
            let mut field_reader = WireReader::new(&field[1..]);
            let token = read_token_prefix(&mut field_reader)?;
            let locking_bytecode = LockingBytecode::from_slice(field_reader.read_bytes(field_reader.remaining())?);
            Ok(TransactionOutput::with_token(value, locking_bytecode, token))
        }
        _ => Ok(TransactionOutput::new(value, LockingBytecode::from_slice(field))),
    }
}

/// Parses a token prefix following the `0xef` marker byte.
fn read_token_prefix(reader: &mut WireReader<'_>) -> DecodeResult<TokenData> {
    let category = reader.read_hash()?;
    let bitfield = reader.read_u8()?;
    if bitfield & TOKEN_BITFIELD_RESERVED != 0 {
        return Err(DecodeError::ReservedTokenBit(bitfield));
    }
    let has_nft = bitfield & TOKEN_BITFIELD_HAS_NFT != 0;
    let has_commitment = bitfield & TOKEN_BITFIELD_HAS_COMMITMENT_LENGTH != 0;
    let has_amount = bitfield & TOKEN_BITFIELD_HAS_AMOUNT != 0;
    let capability = bitfield & TOKEN_BITFIELD_CAPABILITY_MASK;

    if !has_nft && (has_commitment || capability != 0) {
        return Err(DecodeError::CommitmentWithoutNft);
    }
    if !has_nft && !has_amount {
        return Err(DecodeError::EmptyToken);
    }

    let nft = if has_nft {
        let capability = Capability::try_from(capability)?;
        let commitment = if has_commitment {
            let commitment = reader.read_var_bytes()?;
            if commitment.is_empty() {
                return Err(DecodeError::EmptyCommitment);
            }
            if commitment.len() > MAX_COMMITMENT_LENGTH {
                return Err(DecodeError::CommitmentTooLong(commitment.len()));
            }
            commitment.to_vec()
        } else {
            vec![]
        };
        Some(NftData::new(capability, commitment))
    } else {
        None
    };

    let amount = if has_amount {
        let amount = reader.read_compact_size()?;
        if amount == 0 || amount > MAX_TOKEN_AMOUNT {
            return Err(DecodeError::InvalidTokenAmount(amount));
        }
        amount
    } else {
        0
    };

    Ok(TokenData::new(category, amount, nft))
}
