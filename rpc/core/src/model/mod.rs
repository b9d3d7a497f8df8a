//! This module contains RPC-specific data structures
//! used in RPC methods.

pub mod address;
pub mod history;
pub mod index;

pub use address::*;
pub use history::*;
pub use index::*;

pub type RpcTransactionId = bitcann_consensus_core::tx::TransactionId;
pub type RpcTransactionOutpoint = bitcann_consensus_core::tx::TransactionOutpoint;
pub type RpcUtxoEntry = bitcann_consensus_core::utxo::UtxoEntry;
