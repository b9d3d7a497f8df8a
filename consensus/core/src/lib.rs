pub mod constants;
pub mod errors;
pub mod hashing;
pub mod mass;
pub mod serde_bytes;
pub mod tx;
pub mod utxo;
pub mod wire;
