use crate::tx::{TokenData, Transaction, TransactionInput, TransactionOutput};
use bitcann_hashes::HASH_SIZE;

/// Number of bytes taken by a compact size integer.
pub const fn compact_size_len(value: u64) -> u64 {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x10000..=0xffff_ffff => 5,
        _ => 9,
    }
}

// transaction_serialized_size is the exact size of a transaction in the wire
// serialization. Fees are charged per byte of this size, so it must match the
// output of `hashing::tx::serialize` byte for byte.
pub fn transaction_serialized_size(tx: &Transaction) -> u64 {
    let mut size: u64 = 0;
    size += 4; // Tx version (u32)
    size += compact_size_len(tx.inputs.len() as u64);
    let inputs_size: u64 = tx.inputs.iter().map(transaction_input_serialized_size).sum();
    size += inputs_size;

    size += compact_size_len(tx.outputs.len() as u64);
    let outputs_size: u64 = tx.outputs.iter().map(transaction_output_serialized_size).sum();
    size += outputs_size;

    size += 4; // lock time (u32)
    size
}

pub fn transaction_input_serialized_size(input: &TransactionInput) -> u64 {
    let mut size = 0;
    size += outpoint_serialized_size();

    let unlocking_len = input.unlocking_bytecode.len() as u64;
    size += compact_size_len(unlocking_len);
    size += unlocking_len;

    size += 4; // sequence (u32)
    size
}

const fn outpoint_serialized_size() -> u64 {
    let mut size: u64 = 0;
    size += HASH_SIZE as u64; // Previous tx ID
    size += 4; // Index (u32)
    size
}

pub fn transaction_output_serialized_size(output: &TransactionOutput) -> u64 {
    let mut size: u64 = 0;
    size += 8; // value (u64)
    let field_len = output.token.as_ref().map(token_prefix_size).unwrap_or_default() + output.locking_bytecode.len() as u64;
    size += compact_size_len(field_len);
    size += field_len;
    size
}

pub fn token_prefix_size(token: &TokenData) -> u64 {
    let mut size: u64 = 0;
    size += 1; // PREFIX_TOKEN
    size += HASH_SIZE as u64; // category
    size += 1; // bitfield
    let commitment_len = token.commitment().len() as u64;
    if commitment_len > 0 {
        size += compact_size_len(commitment_len);
        size += commitment_len;
    }
    if token.amount > 0 {
        size += compact_size_len(token.amount);
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hashing::tx::{serialize, serialize_output, token_prefix},
        tx::{Capability, LockingBytecode, TokenCategory, TransactionId, TransactionOutpoint},
    };

    #[test]
    fn test_sizes_match_serialization() {
        let category = TokenCategory::from_bytes([9; 32]);
        let tokens = [
            TokenData::fungible(category, 1),
            TokenData::fungible(category, 0xfd),
            TokenData::fungible(category, u32::MAX as u64 + 1),
            TokenData::nft(category, Capability::None, vec![]),
            TokenData::nft(category, Capability::Minting, vec![1; 8]).with_amount(70_000),
            TokenData::nft(category, Capability::Mutable, vec![2; 128]),
        ];
        for token in tokens.iter() {
            assert_eq!(token_prefix_size(token), token_prefix(token).len() as u64);
            let output = TransactionOutput::with_token(1000, LockingBytecode::from_vec(vec![0; 35]), token.clone());
            assert_eq!(transaction_output_serialized_size(&output), serialize_output(&output).len() as u64);
        }

        let inputs = (0..300u32)
            .map(|i| {
                TransactionInput::final_sequence(TransactionOutpoint::new(TransactionId::from_bytes([3; 32]), i), vec![0; i as usize])
            })
            .collect::<Vec<_>>();
        let outputs = tokens
            .iter()
            .map(|token| TransactionOutput::with_token(1000, LockingBytecode::from_vec(vec![0; 25]), token.clone()))
            .collect::<Vec<_>>();
        let tx = Transaction::new_standard(inputs, outputs);
        assert_eq!(transaction_serialized_size(&tx), serialize(&tx).len() as u64);
    }

    #[test]
    fn test_value_patch_keeps_size() {
        let mut tx = Transaction::new_standard(vec![], vec![TransactionOutput::new(u64::MAX, LockingBytecode::from_vec(vec![0; 25]))]);
        let before = tx.serialized_size();
        tx.outputs[0].value = 1;
        assert_eq!(tx.serialized_size(), before);
        assert_eq!(serialize(&tx).len() as u64, before);
    }
}
