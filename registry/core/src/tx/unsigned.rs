use crate::imports::*;

/// A fully sized transaction awaiting signatures.
///
/// The inputs listed in `signing_inputs` carry placeholder P2PKH unlocking
/// bytecode of the final size; the wallet replaces it with the real signature
/// and public key pushes. `utxo_entries` are the outputs spent by each input,
/// in input order, as needed for signature hashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    pub transaction: Transaction,
    pub utxo_entries: Vec<UtxoEntry>,
    pub signing_inputs: Vec<usize>,
    pub fee: u64,
}

impl UnsignedTransaction {
    pub fn id(&self) -> TransactionId {
        self.transaction.id()
    }

    pub fn serialized_size(&self) -> u64 {
        self.transaction.serialized_size()
    }

    pub fn to_hex(&self) -> String {
        faster_hex::hex_string(&self.transaction.to_bytes())
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.transaction.outputs
    }
}
