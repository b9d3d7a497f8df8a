//! # RPC Core
//!
//! Query surfaces consumed by the BitCANN registry library: the [`LedgerApi`](api::ledger::LedgerApi)
//! trait over a node or electrum-style indexer, the optional
//! [`TokenIndexApi`](api::ledger::TokenIndexApi) over a token output index, and the data
//! structures they return.
//!

pub mod api;
pub mod error;
pub mod model;

pub mod prelude {
    //! Re-exports of the most commonly used types and traits in this crate.
    pub use super::api::ledger::*;
    pub use super::model::*;
}

pub use api::ledger::*;
pub use error::*;
pub use model::*;
