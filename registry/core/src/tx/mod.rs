//!
//! Transaction assembly: the generator that sizes and balances transactions
//! and one builder per registry operation.
//!

pub mod builders;
pub mod fees;
pub mod generator;
pub mod unsigned;

pub use builders::BuildContext;
pub use fees::FeePolicy;
pub use generator::TransactionGenerator;
pub use unsigned::UnsignedTransaction;
