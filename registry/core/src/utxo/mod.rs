//!
//! Classification of fetched outputs into the structural roles of the registry.
//!

pub mod classifier;
pub mod role;

pub use classifier::{ClassificationContext, ClassifiedUtxos};
pub use role::{Auction, ClassifiedUtxo, UtxoRole};
