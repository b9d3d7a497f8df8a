//!
//! Common imports used internally by the registry crate.
//!

pub use crate::config::{Params, RegistryConfig};
pub use crate::contracts::{Argument, Covenant, RegistryContracts, Unlock};
pub use crate::error::Error;
pub use crate::result::Result;
pub use crate::utxo::{Auction, ClassifiedUtxo, ClassifiedUtxos, UtxoRole};

pub use bitcann_addresses::{Address, Prefix};
pub use bitcann_consensus_core::tx::{
    Capability, LockingBytecode, TokenCategory, TokenData, Transaction, TransactionId, TransactionOutpoint, TransactionOutput,
};
pub use bitcann_consensus_core::utxo::UtxoEntry;
pub use bitcann_hashes::Hash;
pub use bitcann_rpc_core::{LedgerApi, TokenIndexApi};
pub use log::{debug, trace, warn};
pub use serde::{Deserialize, Serialize};
pub use std::collections::{BTreeMap, HashMap, HashSet};
pub use std::sync::Arc;
