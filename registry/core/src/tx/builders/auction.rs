use super::BuildContext;
use crate::imports::*;
use crate::name::{address_to_pkh, auction_commitment, encode_registration_id, name_to_bytes, pkh_to_address, validate_name};
use crate::pricing::{auction_price, minimum_next_bid};
use crate::tx::UnsignedTransaction;

/// Opens the auction of `name` with an initial bid of `amount` satoshis from
/// `bidder`, who also funds the transaction and receives the change.
pub fn create_auction(
    ctx: &BuildContext,
    registry: &ClassifiedUtxos,
    funding: &ClassifiedUtxos,
    name: &str,
    amount: u64,
    bidder: &Address,
) -> Result<UnsignedTransaction> {
    validate_name(name)?;
    let bidder_pkh = address_to_pkh(bidder)?;
    let covenant = &ctx.contracts.auction;
    let thread = registry.thread(covenant)?;
    let contract = registry.authorized_contract_utxo(covenant)?;
    let (counter, registration_id) = registry.registration_counter()?;

    let required = auction_price(registration_id, ctx.params.min_starting_bid, ctx.params.auction_price_floor);
    if amount < required {
        return Err(Error::AuctionAmountTooLow { amount, required });
    }
    let counter_amount = counter.token_amount();
    if counter_amount < registration_id {
        return Err(Error::InsufficientCounterTokens { available: counter_amount, required: registration_id });
    }
    let funding = funding.funding(amount)?;
    debug!("creating auction for '{name}' with registration id {registration_id} at {amount} satoshis, funded by {}", funding.outpoint());

    let mut generator = ctx.generator();
    ctx.add_authorized_pair(&mut generator, thread, contract, covenant, &Unlock::Call(vec![]))?;
    ctx.add_registry_input(&mut generator, &counter.entry)?;
    generator.add_p2pkh_input(&funding.entry);

    let registry_locking = ctx.contracts.registry.locking_bytecode().clone();
    let next_counter = TokenData::nft(ctx.category(), Capability::Minting, encode_registration_id(registration_id + 1).to_vec())
        .with_amount(counter_amount - registration_id);
    let auction = TokenData::nft(ctx.category(), Capability::Mutable, auction_commitment(&bidder_pkh, &name_to_bytes(name)))
        .with_amount(registration_id);
    generator
        .reemit(&thread.entry)
        .reemit(&contract.entry)
        .add_output(TransactionOutput::with_token(counter.value(), registry_locking.clone(), next_counter))
        .add_output(TransactionOutput::with_token(amount, registry_locking, auction));

    generator.generate(ctx.locking(&pkh_to_address(&bidder_pkh, bidder.prefix, false)))
}

/// Outbids the running auction of `name`. The previous bidder is refunded
/// their bid in the same transaction.
pub fn bid(
    ctx: &BuildContext,
    registry: &ClassifiedUtxos,
    funding: &ClassifiedUtxos,
    name: &str,
    amount: u64,
    bidder: &Address,
) -> Result<UnsignedTransaction> {
    let bidder_pkh = address_to_pkh(bidder)?;
    let name_bytes = name_to_bytes(name);
    let auction = registry.auction(&name_bytes)?;
    let required = minimum_next_bid(auction.amount, ctx.params.min_bid_increase_percentage);
    if amount < required {
        return Err(Error::BidTooLow { amount, required });
    }

    let covenant = &ctx.contracts.bid;
    let thread = registry.thread(covenant)?;
    let contract = registry.authorized_contract_utxo(covenant)?;
    let funding = funding.funding(amount)?;
    debug!("bidding {amount} satoshis on '{name}' over {} at {}", auction.amount, auction.outpoint());

    let mut generator = ctx.generator();
    ctx.add_authorized_pair(&mut generator, thread, contract, covenant, &Unlock::Call(vec![]))?;
    ctx.add_registry_input(&mut generator, &auction.entry)?;
    generator.add_p2pkh_input(&funding.entry);

    let token = TokenData::nft(ctx.category(), Capability::Mutable, auction_commitment(&bidder_pkh, &name_bytes))
        .with_amount(auction.registration_id);
    let previous_bidder = pkh_to_address(&auction.bidder, bidder.prefix, false);
    generator
        .reemit(&thread.entry)
        .reemit(&contract.entry)
        .add_output(TransactionOutput::with_token(amount, auction.entry.locking_bytecode().clone(), token))
        .add_output(TransactionOutput::new(auction.amount, ctx.locking(&previous_bidder)));

    generator.generate(ctx.locking(&pkh_to_address(&bidder_pkh, bidder.prefix, false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::split_auction_commitment;
    use crate::tests::fixtures::*;

    #[test]
    fn test_create_auction() {
        let contracts = test_contracts();
        let ctx = BuildContext::new(&TEST_PARAMS, &contracts);
        let registry = classify(&contracts, registry_genesis(&contracts, 1, 1_000_000));
        let alice = test_address(1);
        let funding = classify(&contracts, vec![p2pkh_entry(200, [1; 20], 1_000_000)]);

        // the registry address alone holds no spendable output of the auction covenant
        assert!(matches!(
            create_auction(&ctx, &registry, &funding, "alice", 150_000, &alice),
            Err(Error::AuthorizedContractNotFound(name)) if name == "Auction"
        ));
        let registry = with_covenant(&contracts, registry, &contracts.auction);

        let unsigned = create_auction(&ctx, &registry, &funding, "alice", 150_000, &alice).unwrap();
        let outputs = unsigned.outputs();
        assert_eq!(unsigned.transaction.inputs.len(), 4);
        assert_eq!(outputs.len(), 5);
        assert_eq!(unsigned.signing_inputs, vec![3]);

        let counter = outputs[2].token.as_ref().unwrap();
        assert_eq!(counter.commitment(), &[0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(counter.amount, 999_999);
        let auction = outputs[3].token.as_ref().unwrap();
        assert_eq!(outputs[3].value, 150_000);
        assert_eq!(auction.amount, 1);
        assert_eq!(auction.capability(), Some(Capability::Mutable));
        assert_eq!(split_auction_commitment(auction.commitment()).unwrap(), ([1; 20], &b"alice"[..]));
        assert_eq!(outputs[4].value, 1_000_000 - 150_000 - unsigned.fee);
    }

    #[test]
    fn test_create_auction_preconditions() {
        let contracts = test_contracts();
        let ctx = BuildContext::new(&TEST_PARAMS, &contracts);
        let registry = with_covenant(&contracts, classify(&contracts, registry_genesis(&contracts, 1, 1_000_000)), &contracts.auction);
        let funding = classify(&contracts, vec![p2pkh_entry(200, [1; 20], 1_000_000)]);
        let alice = test_address(1);

        assert!(matches!(create_auction(&ctx, &registry, &funding, "bad name!", 150_000, &alice), Err(Error::InvalidName { index: 3, .. })));
        assert!(matches!(
            create_auction(&ctx, &registry, &funding, "alice", 99_998, &alice),
            Err(Error::AuctionAmountTooLow { amount: 99_998, required: 99_999 })
        ));
        assert!(matches!(create_auction(&ctx, &registry, &funding, "alice", 2_000_000, &alice), Err(Error::FundingNotFound(2_000_000))));

        let starved = with_covenant(&contracts, classify(&contracts, registry_genesis(&contracts, 5, 4)), &contracts.auction);
        assert!(matches!(
            create_auction(&ctx, &starved, &funding, "alice", 150_000, &alice),
            Err(Error::InsufficientCounterTokens { available: 4, required: 5 })
        ));
    }

    #[test]
    fn test_bid() {
        let contracts = test_contracts();
        let ctx = BuildContext::new(&TEST_PARAMS, &contracts);
        let mut entries = registry_genesis(&contracts, 2, 1_000_000);
        entries.push(auction_entry(&contracts, 150, b"alice", [1; 20], 100_000, 1));
        let registry = with_covenant(&contracts, classify(&contracts, entries), &contracts.bid);
        let bob = test_address(2);
        let funding = classify(&contracts, vec![p2pkh_entry(201, [2; 20], 1_000_000)]);

        assert!(matches!(bid(&ctx, &registry, &funding, "alice", 104_999, &bob), Err(Error::BidTooLow { amount: 104_999, required: 105_000 })));
        let unsigned = bid(&ctx, &registry, &funding, "alice", 105_000, &bob).unwrap();
        let outputs = unsigned.outputs();
        assert_eq!(outputs.len(), 5);
        assert_eq!(outputs[2].value, 105_000);
        assert_eq!(outputs[2].token.as_ref().unwrap().amount, 1);
        assert_eq!(split_auction_commitment(outputs[2].token.as_ref().unwrap().commitment()).unwrap().0, [2; 20]);
        assert_eq!(outputs[3].value, 100_000);
        assert_eq!(outputs[3].locking_bytecode, p2pkh_locking([1; 20]));
        assert!(matches!(bid(&ctx, &registry, &funding, "bob", 200_000, &bob), Err(Error::AuctionNotFound(_))));
    }
}
