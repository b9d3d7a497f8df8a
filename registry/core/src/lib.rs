//!
//! # BitCANN registry core
//!
//! Off-chain counterpart of the BitCANN covenants: a name registry on Bitcoin
//! Cash where names are auctioned, bid on, claimed, penalized and decorated
//! with records, all carried by CashTokens outputs.
//!
//! The crate classifies fetched outputs into their structural roles
//! ([`utxo`]), assembles unsigned transactions for every registry operation
//! ([`tx`]), resolves the current owner of a name by following its identity
//! token ([`resolver`]) and exposes all of it through the [`NameService`]
//! facade ([`service`]).
//!
//! Signing and broadcasting are left to the caller: every builder returns an
//! [`UnsignedTransaction`](tx::UnsignedTransaction) whose P2PKH inputs carry
//! correctly sized placeholder unlocking bytecode.
//!

pub mod config;
pub mod contracts;
pub mod error;
mod imports;
pub mod name;
pub mod pricing;
pub mod records;
pub mod resolver;
pub mod result;
pub mod service;
pub mod tx;
pub mod utxo;

#[cfg(test)]
pub mod tests;

pub mod prelude {
    //! Re-exports of the most commonly used types.
    pub use crate::config::{NetworkType, Params, RegistryConfig};
    pub use crate::contracts::{ArtifactSet, RegistryContracts};
    pub use crate::error::{Error, ErrorKind};
    pub use crate::resolver::{ResolutionStrategy, ResolvedOwner};
    pub use crate::result::Result;
    pub use crate::service::NameService;
    pub use crate::tx::UnsignedTransaction;
    pub use crate::utxo::{Auction, UtxoRole};
}

pub use result::Result;
pub use service::NameService;
