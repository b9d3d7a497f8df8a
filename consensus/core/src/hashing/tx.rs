use super::{WriterBase, WriterExtensions};
use crate::{
    mass::transaction_serialized_size,
    tx::{PREFIX_TOKEN, TokenData, Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput},
};
use bitcann_hashes::hash256;

/// Returns the transaction id: double SHA-256 of the full serialization.
///
/// Not intended for direct use by clients. Instead use `tx.id()`
pub fn id(tx: &Transaction) -> TransactionId {
    hash256(&serialize(tx))
}

/// Serializes the transaction in the network wire format.
pub fn serialize(tx: &Transaction) -> Vec<u8> {
    let mut buf = Vec::with_capacity(transaction_serialized_size(tx) as usize);
    write_transaction(&mut buf, tx);
    buf
}

/// Serializes an output as it appears inside a transaction.
pub fn serialize_output(output: &TransactionOutput) -> Vec<u8> {
    let mut buf = Vec::new();
    write_output(&mut buf, output);
    buf
}

/// Write the transaction into the provided writer
fn write_transaction<T: WriterBase>(writer: &mut T, tx: &Transaction) {
    writer.write_u32(tx.version).write_compact_size(tx.inputs.len() as u64);
    for input in tx.inputs.iter() {
        write_input(writer, input);
    }

    writer.write_compact_size(tx.outputs.len() as u64);
    for output in tx.outputs.iter() {
        write_output(writer, output);
    }

    writer.write_u32(tx.lock_time);
}

#[inline(always)]
fn write_input<T: WriterBase>(writer: &mut T, input: &TransactionInput) {
    write_outpoint(writer, &input.previous_outpoint);
    writer.write_var_bytes(&input.unlocking_bytecode).write_u32(input.sequence);
}

#[inline(always)]
fn write_outpoint<T: WriterBase>(writer: &mut T, outpoint: &TransactionOutpoint) {
    writer.update(outpoint.transaction_id).write_u32(outpoint.index);
}

#[inline(always)]
fn write_output<T: WriterBase>(writer: &mut T, output: &TransactionOutput) {
    writer.write_u64(output.value);
    match &output.token {
        Some(token) => {
            let mut field = token_prefix(token);
            field.extend_from_slice(output.locking_bytecode.script());
            writer.write_var_bytes(&field);
        }
        None => {
            writer.write_var_bytes(output.locking_bytecode.script());
        }
    }
}

/// Encodes the CashTokens prefix that precedes the locking bytecode of a token output.
pub fn token_prefix(token: &TokenData) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(crate::mass::token_prefix_size(token) as usize);
    prefix.update([PREFIX_TOKEN]).update(token.category).update([token.bitfield()]);
    let commitment = token.commitment();
    if !commitment.is_empty() {
        prefix.write_var_bytes(commitment);
    }
    if token.amount > 0 {
        prefix.write_compact_size(token.amount);
    }
    prefix
}
