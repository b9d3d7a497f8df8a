use super::BuildContext;
use crate::imports::*;
use crate::tx::UnsignedTransaction;
use bitcann_consensus_core::constants::DUST_THRESHOLD;

/// Moves the fungible tokens collected by a thread back into the registration
/// counter, replenishing the ids it can hand out.
pub fn accumulate(ctx: &BuildContext, registry: &ClassifiedUtxos, funding: &ClassifiedUtxos, payer: &Address) -> Result<UnsignedTransaction> {
    let covenant = &ctx.contracts.accumulator;
    let thread = registry.thread(covenant)?;
    let contract = registry.authorized_contract_utxo(covenant)?;
    let (counter, _) = registry.registration_counter()?;
    let token_thread = registry.token_thread(&thread.outpoint())?;
    let funding = funding.funding(DUST_THRESHOLD)?;
    debug!("accumulating {} tokens from thread {} into the registration counter", token_thread.token_amount(), token_thread.outpoint());

    let mut generator = ctx.generator();
    ctx.add_authorized_pair(&mut generator, thread, contract, covenant, &Unlock::Call(vec![]))?;
    ctx.add_registry_input(&mut generator, &counter.entry)?;
    ctx.add_registry_input(&mut generator, &token_thread.entry)?;
    generator.add_p2pkh_input(&funding.entry);
    generator
        .reemit(&thread.entry)
        .reemit(&contract.entry)
        .add_output(ctx.with_token_amount(counter, counter.token_amount() + token_thread.token_amount()))
        .add_output(ctx.with_token_amount(token_thread, 0));

    generator.generate(ctx.locking(payer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::*;

    #[test]
    fn test_accumulate() {
        let contracts = test_contracts();
        let ctx = BuildContext::new(&TEST_PARAMS, &contracts);
        let mut entries = registry_genesis(&contracts, 10, 1_000);
        entries.push(thread_entry(&contracts, 170, &contracts.factory, 45));
        let registry = with_covenant(&contracts, classify(&contracts, entries), &contracts.accumulator);
        let funding = classify(&contracts, vec![p2pkh_entry(200, [1; 20], 10_000)]);

        let unsigned = accumulate(&ctx, &registry, &funding, &test_address(1)).unwrap();
        let outputs = unsigned.outputs();
        assert_eq!(outputs.len(), 5);
        assert_eq!(outputs[2].token.as_ref().unwrap().amount, 1_045);
        assert_eq!(outputs[2].token.as_ref().unwrap().commitment(), &[0, 0, 0, 0, 0, 0, 0, 10]);
        assert_eq!(outputs[3].token.as_ref().unwrap().amount, 0);
        assert_eq!(unsigned.transaction.inputs[3].previous_outpoint, outpoint(170));

        let empty = with_covenant(&contracts, classify(&contracts, registry_genesis(&contracts, 10, 1_000)), &contracts.accumulator);
        assert!(matches!(accumulate(&ctx, &empty, &funding, &test_address(1)), Err(Error::TokenThreadNotFound)));
    }
}
