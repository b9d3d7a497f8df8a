//!
//! Transaction generator: collects inputs and outputs, sizes the transaction
//! and assigns whatever is left after the fee to a final output.
//!

use super::{FeePolicy, UnsignedTransaction};
use crate::imports::*;
use bitcann_consensus_core::constants::{DUST_THRESHOLD, SEQUENCE_FINAL};
use bitcann_consensus_core::tx::TransactionInput;
use bitcann_txscript::pay_to_pub_key_hash_placeholder;

pub struct TransactionGenerator {
    fee_policy: FeePolicy,
    inputs: Vec<TransactionInput>,
    utxo_entries: Vec<UtxoEntry>,
    signing_inputs: Vec<usize>,
    outputs: Vec<TransactionOutput>,
    reserved: u64,
}

impl TransactionGenerator {
    pub fn new(fee_policy: FeePolicy) -> Self {
        Self { fee_policy, inputs: vec![], utxo_entries: vec![], signing_inputs: vec![], outputs: vec![], reserved: 0 }
    }

    /// Satoshis withheld from the final output on top of the fee.
    pub fn with_reserved(mut self, reserved: u64) -> Self {
        self.reserved = reserved;
        self
    }

    pub fn add_covenant_input(&mut self, entry: &UtxoEntry, covenant: &Covenant, unlock: &Unlock) -> Result<&mut Self> {
        self.add_covenant_input_with_sequence(entry, covenant, unlock, SEQUENCE_FINAL)
    }

    /// A covenant input with a relative lock-time in `sequence`.
    pub fn add_covenant_input_with_sequence(
        &mut self,
        entry: &UtxoEntry,
        covenant: &Covenant,
        unlock: &Unlock,
        sequence: u32,
    ) -> Result<&mut Self> {
        let unlocking_bytecode = covenant.unlocking_bytecode(unlock)?;
        trace!("input {} unlocks {} via {}", entry.outpoint, covenant.name(), unlock.function());
        self.inputs.push(TransactionInput::new(entry.outpoint, unlocking_bytecode, sequence));
        self.utxo_entries.push(entry.clone());
        Ok(self)
    }

    /// A P2PKH input signed later by the wallet.
    pub fn add_p2pkh_input(&mut self, entry: &UtxoEntry) -> &mut Self {
        self.signing_inputs.push(self.inputs.len());
        self.inputs.push(TransactionInput::final_sequence(entry.outpoint, pay_to_pub_key_hash_placeholder()));
        self.utxo_entries.push(entry.clone());
        self
    }

    pub fn add_output(&mut self, output: TransactionOutput) -> &mut Self {
        self.outputs.push(output);
        self
    }

    /// Re-emits a spent output unchanged, as threads and covenant outputs are.
    pub fn reemit(&mut self, entry: &UtxoEntry) -> &mut Self {
        self.add_output(entry.output.clone())
    }

    fn input_value(&self) -> u64 {
        self.utxo_entries.iter().map(UtxoEntry::value).sum()
    }

    fn output_value(&self) -> u64 {
        self.outputs.iter().map(|output| output.value).sum()
    }

    /// Fungible amounts of every category must leave the transaction exactly
    /// as they entered it.
    fn check_token_conservation(&self) -> Result<()> {
        let mut balances: BTreeMap<TokenCategory, (u64, u64)> = BTreeMap::new();
        for token in self.utxo_entries.iter().filter_map(UtxoEntry::token) {
            balances.entry(token.category).or_default().0 += token.amount;
        }
        for token in self.outputs.iter().filter_map(|output| output.token.as_ref()) {
            balances.entry(token.category).or_default().1 += token.amount;
        }
        match balances.into_iter().find(|(_, (inputs, outputs))| inputs != outputs) {
            Some((category, (inputs, outputs))) => Err(Error::TokenConservation { category, inputs, outputs }),
            None => Ok(()),
        }
    }

    /// Appends the final output paying to `final_locking` and sizes the
    /// transaction in two passes: the final output first carries every
    /// available satoshi, then is patched down by the fee. The value field is
    /// fixed width so patching leaves the size, and thus the fee, unchanged.
    pub fn generate(mut self, final_locking: LockingBytecode) -> Result<UnsignedTransaction> {
        self.check_token_conservation()?;

        let input_value = self.input_value();
        let output_value = self.output_value();
        let available = input_value.checked_sub(output_value).ok_or(Error::InsufficientFunds { required: output_value, available: input_value })?;

        self.outputs.push(TransactionOutput::new(available, final_locking));
        let mut transaction = Transaction::new_standard(self.inputs, self.outputs);
        let size = transaction.serialized_size();
        let fee = self.fee_policy.fee(size);

        let required = fee.saturating_add(self.reserved).saturating_add(DUST_THRESHOLD);
        if available < required {
            return Err(Error::InsufficientFunds { required: output_value.saturating_add(required), available: input_value });
        }
        if let Some(final_output) = transaction.outputs.last_mut() {
            final_output.value = available - fee - self.reserved;
        }
        debug_assert_eq!(transaction.serialized_size(), size);

        debug!(
            "generated transaction {} with {} inputs, {} outputs, {} bytes, fee {}",
            transaction.id(),
            transaction.inputs.len(),
            transaction.outputs.len(),
            size,
            fee
        );
        Ok(UnsignedTransaction { transaction, utxo_entries: self.utxo_entries, signing_inputs: self.signing_inputs, fee })
    }
}
