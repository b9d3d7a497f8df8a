use super::BuildContext;
use crate::imports::*;
use crate::name::{encode_registration_id, identity_commitment, pkh_to_address};
use crate::pricing::creator_incentive;
use crate::tx::UnsignedTransaction;
use bitcann_consensus_core::constants::TOKEN_OUTPUT_DUST;

/// Closes the auction of `name` once it has aged `min_wait_time` blocks and
/// issues the name's tokens: the internal and external authorization tokens
/// to the name covenant and the ownership token to the winning bidder.
///
/// The transaction is funded by the auction itself. Whoever builds it may
/// collect the creator incentive at `creator`; the rest goes to the winner.
pub fn claim(ctx: &BuildContext, registry: &ClassifiedUtxos, name: &[u8], creator: &Address) -> Result<UnsignedTransaction> {
    let auction = registry.auction(name)?;
    let covenant = &ctx.contracts.factory;
    let thread = registry.thread(covenant)?;
    let contract = registry.authorized_contract_utxo(covenant)?;
    let minting = registry.claim_minting()?;
    let name_contract = ctx.contracts.name_contract(name)?;
    let registration_id = auction.registration_id;
    debug!("claiming '{}' with registration id {registration_id} for {} satoshis", auction.name_str(), auction.amount);

    let mut generator = ctx.generator();
    ctx.add_authorized_pair(&mut generator, thread, contract, covenant, &Unlock::Call(vec![]))?;
    ctx.add_registry_input(&mut generator, &minting.entry)?;
    generator.add_covenant_input_with_sequence(&auction.entry, &ctx.contracts.registry, &Unlock::Call(vec![]), ctx.params.min_wait_time)?;

    let category = ctx.category();
    let winner = pkh_to_address(&auction.bidder, creator.prefix, true);
    generator
        .add_output(ctx.with_token_amount(thread, thread.token_amount() + registration_id))
        .reemit(&contract.entry)
        .reemit(&minting.entry)
        .add_output(TransactionOutput::with_token(
            TOKEN_OUTPUT_DUST,
            name_contract.locking_bytecode().clone(),
            TokenData::nft(category, Capability::None, encode_registration_id(registration_id).to_vec()),
        ))
        .add_output(TransactionOutput::with_token(
            TOKEN_OUTPUT_DUST,
            name_contract.locking_bytecode().clone(),
            TokenData::nft(category, Capability::None, vec![]),
        ))
        .add_output(TransactionOutput::with_token(
            TOKEN_OUTPUT_DUST,
            ctx.locking(&winner),
            TokenData::nft(category, Capability::None, identity_commitment(registration_id, name)),
        ));
    if let Some(incentive) = creator_incentive(auction.amount, registration_id, ctx.params) {
        generator.add_output(TransactionOutput::new(incentive, ctx.locking(creator)));
    }

    generator.generate(ctx.locking(&winner))
}
