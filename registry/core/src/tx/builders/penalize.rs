use super::BuildContext;
use crate::imports::*;
use crate::name::{display_name, find_first_invalid_byte_index};
use crate::tx::UnsignedTransaction;

/// Burns the auction of a name containing an invalid character. The auction's
/// satoshis, minus the fee, go to `reward`.
pub fn penalize_invalid_name(ctx: &BuildContext, registry: &ClassifiedUtxos, name: &[u8], reward: &Address) -> Result<UnsignedTransaction> {
    let auction = registry.auction(name)?;
    let index = find_first_invalid_byte_index(name).ok_or_else(|| Error::NameIsValid(display_name(name)))?;
    let covenant = &ctx.contracts.auction_name_enforcer;
    let thread = registry.thread(covenant)?;
    let contract = registry.authorized_contract_utxo(covenant)?;
    debug!("penalizing invalid name '{}' at byte {index}", auction.name_str());

    let mut generator = ctx.generator();
    ctx.add_authorized_pair(&mut generator, thread, contract, covenant, &Unlock::Call(vec![Argument::Int(index as i64)]))?;
    ctx.add_registry_input(&mut generator, &auction.entry)?;
    generator.add_output(ctx.with_token_amount(thread, thread.token_amount() + auction.registration_id)).reemit(&contract.entry);

    generator.generate(ctx.locking(reward))
}

/// Burns the second auction of a name auctioned twice. The auction with the
/// lowest registration id is kept.
pub fn penalize_duplicate_auction(ctx: &BuildContext, registry: &ClassifiedUtxos, name: &[u8], reward: &Address) -> Result<UnsignedTransaction> {
    let auctions = registry.running_auctions(name);
    let [valid, duplicate, ..] = auctions.as_slice() else {
        return Err(Error::NoDuplicateAuction(display_name(name)));
    };
    let covenant = &ctx.contracts.auction_conflict_resolver;
    let thread = registry.thread(covenant)?;
    let contract = registry.authorized_contract_utxo(covenant)?;
    debug!(
        "penalizing duplicate auction of '{}': keeping registration id {}, burning {}",
        valid.name_str(),
        valid.registration_id,
        duplicate.registration_id
    );

    let mut generator = ctx.generator();
    ctx.add_authorized_pair(&mut generator, thread, contract, covenant, &Unlock::Call(vec![]))?;
    ctx.add_registry_input(&mut generator, &valid.entry)?;
    ctx.add_registry_input(&mut generator, &duplicate.entry)?;
    generator
        .add_output(ctx.with_token_amount(thread, thread.token_amount() + duplicate.registration_id))
        .reemit(&contract.entry)
        .reemit(&valid.entry);

    generator.generate(ctx.locking(reward))
}

/// Burns an auction of a name that is already owned. The name covenant's
/// external authorization token proves the name has been claimed.
pub fn penalize_illegal_auction(
    ctx: &BuildContext,
    registry: &ClassifiedUtxos,
    name_utxos: &ClassifiedUtxos,
    name: &[u8],
    reward: &Address,
) -> Result<UnsignedTransaction> {
    let auction = registry.auction(name)?;
    let external_auth = name_utxos.external_auth(name)?;
    let covenant = &ctx.contracts.name_ownership_guard;
    let thread = registry.thread(covenant)?;
    let contract = registry.authorized_contract_utxo(covenant)?;
    let name_contract = ctx.contracts.name_contract(name)?;
    debug!("penalizing illegal auction of owned name '{}'", auction.name_str());

    let mut generator = ctx.generator();
    ctx.add_authorized_pair(&mut generator, thread, contract, covenant, &Unlock::Call(vec![]))?;
    generator.add_covenant_input(&external_auth.entry, &name_contract, &Unlock::UseAuth(1))?;
    ctx.add_registry_input(&mut generator, &auction.entry)?;
    generator
        .add_output(ctx.with_token_amount(thread, thread.token_amount() + auction.registration_id))
        .reemit(&contract.entry)
        .reemit(&external_auth.entry);

    generator.generate(ctx.locking(reward))
}
