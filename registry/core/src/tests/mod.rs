//!
//! Utilities and helpers for unit and scenario testing.
//!

pub mod fixtures;
pub mod ledger_mock;
