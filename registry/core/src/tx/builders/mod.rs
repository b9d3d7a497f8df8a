//!
//! Builders for every registry operation. Each one locates the outputs the
//! covenants require among already classified UTXOs, checks the operation's
//! preconditions and lays out inputs and outputs in the exact order the
//! covenants enforce.
//!
//! | operation | inputs | outputs |
//! |---|---|---|
//! | create auction | thread, auction, counter, funding | thread, auction, counter, new auction, change |
//! | bid | thread, bid, auction, funding | thread, bid, auction, refund, change |
//! | claim | thread, factory, minting, auction | thread, factory, minting, internal auth, external auth, ownership, (incentive), residual |
//! | penalize invalid name | thread, enforcer, auction | thread, enforcer, reward |
//! | penalize duplicate | thread, resolver, valid auction, duplicate | thread, resolver, valid auction, reward |
//! | penalize illegal | thread, guard, external auth, auction | thread, guard, external auth, reward |
//! | attach records | internal auth, ownership, funding | internal auth, ownership, OP_RETURN..., change |
//! | accumulate | thread, accumulator, counter, token thread, funding | thread, accumulator, counter, token thread, change |
//!

mod accumulate;
mod auction;
mod claim;
mod penalize;
mod records;

pub use accumulate::accumulate;
pub use auction::{bid, create_auction};
pub use claim::claim;
pub use penalize::{penalize_duplicate_auction, penalize_illegal_auction, penalize_invalid_name};
pub use records::attach_records;

use super::{FeePolicy, TransactionGenerator};
use crate::imports::*;
use bitcann_txscript::pay_to_address_script;

/// Deployment state shared by every builder.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub params: &'a Params,
    pub contracts: &'a RegistryContracts,
}

impl<'a> BuildContext<'a> {
    pub fn new(params: &'a Params, contracts: &'a RegistryContracts) -> Self {
        Self { params, contracts }
    }

    pub fn category(&self) -> TokenCategory {
        self.contracts.category
    }

    pub fn generator(&self) -> TransactionGenerator {
        TransactionGenerator::new(FeePolicy::new(self.params.fee_rate))
    }

    /// Spends an output held by the registry covenant (threads, the counter,
    /// the claim minting token and auctions).
    pub fn add_registry_input(&self, generator: &mut TransactionGenerator, entry: &UtxoEntry) -> Result<()> {
        generator.add_covenant_input(entry, &self.contracts.registry, &Unlock::Call(vec![]))?;
        Ok(())
    }

    /// Spends a thread together with the token-free output of the covenant it
    /// authorizes. Outputs are left to the caller.
    pub fn add_authorized_pair(
        &self,
        generator: &mut TransactionGenerator,
        thread: &ClassifiedUtxo,
        contract: &ClassifiedUtxo,
        covenant: &Covenant,
        unlock: &Unlock,
    ) -> Result<()> {
        self.add_registry_input(generator, &thread.entry)?;
        generator.add_covenant_input(&contract.entry, covenant, unlock)?;
        Ok(())
    }

    /// Re-emits `utxo` with its fungible amount replaced by `amount`.
    pub fn with_token_amount(&self, utxo: &ClassifiedUtxo, amount: u64) -> TransactionOutput {
        let mut output = utxo.entry.output.clone();
        if let Some(token) = output.token.as_mut() {
            token.amount = amount;
        }
        output
    }

    pub fn locking(&self, address: &Address) -> LockingBytecode {
        pay_to_address_script(address)
    }
}
