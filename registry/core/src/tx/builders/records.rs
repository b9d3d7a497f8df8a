use super::BuildContext;
use crate::imports::*;
use crate::name::display_name;
use crate::records::validate_record;
use crate::tx::UnsignedTransaction;
use bitcann_consensus_core::constants::DUST_THRESHOLD;
use bitcann_txscript::null_data_script;

/// Publishes `records` for `name`, one `OP_RETURN` output per record.
///
/// The name covenant's canonical internal authorization token is spent next
/// to the owner's ownership token, which must carry the same registration id:
/// that pairing is what lets readers attribute the records to the owner.
pub fn attach_records<S: AsRef<str>>(
    ctx: &BuildContext,
    name_utxos: &ClassifiedUtxos,
    owner_utxos: &ClassifiedUtxos,
    name: &[u8],
    records: &[S],
    owner: &Address,
) -> Result<UnsignedTransaction> {
    if records.is_empty() {
        return Err(Error::custom("no records to attach"));
    }
    for record in records {
        validate_record(record.as_ref())?;
    }
    let (internal_auth, registration_id) = name_utxos.internal_auth(name)?;
    let (ownership, owned_id) = owner_utxos.ownership(name)?;
    if owned_id != registration_id {
        warn!("ownership token of '{}' has registration id {owned_id}, the name is registered as {registration_id}", display_name(name));
        return Err(Error::OwnershipNotFound(display_name(name)));
    }
    let funding = owner_utxos.funding(DUST_THRESHOLD)?;
    let name_contract = ctx.contracts.name_contract(name)?;
    debug!("attaching {} records to '{}'", records.len(), display_name(name));

    let mut generator = ctx.generator();
    generator.add_covenant_input(&internal_auth.entry, &name_contract, &Unlock::UseAuth(0))?;
    generator.add_p2pkh_input(&ownership.entry).add_p2pkh_input(&funding.entry);
    generator.reemit(&internal_auth.entry).reemit(&ownership.entry);
    for record in records {
        generator.add_output(TransactionOutput::new(0, null_data_script(&[record.as_ref().as_bytes()])?));
    }

    generator.generate(ctx.locking(owner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::{encode_registration_id, extract_op_return_pushes, identity_commitment};
    use crate::records::RecordsError;
    use crate::tests::fixtures::*;

    fn name_state(contracts: &RegistryContracts, registration_id: u64) -> (ClassifiedUtxos, ClassifiedUtxos) {
        let alice = contracts.name_contract(b"alice").unwrap();
        let category = contracts.category;
        let name_utxos = classify(
            contracts,
            vec![token_entry(
                160,
                alice.locking_bytecode().clone(),
                1_000,
                TokenData::nft(category, Capability::None, encode_registration_id(1).to_vec()),
            )],
        );
        let owner_utxos = classify(
            contracts,
            vec![
                token_entry(161, p2pkh_locking([1; 20]), 1_000, TokenData::nft(category, Capability::None, identity_commitment(registration_id, b"alice"))),
                p2pkh_entry(162, [1; 20], 20_000),
            ],
        );
        (name_utxos, owner_utxos)
    }

    #[test]
    fn test_attach_records() {
        let contracts = test_contracts();
        let ctx = BuildContext::new(&TEST_PARAMS, &contracts);
        let (name_utxos, owner_utxos) = name_state(&contracts, 1);
        let records = ["social.twitter=@alice", "avatar=ipfs://x"];

        let unsigned = attach_records(&ctx, &name_utxos, &owner_utxos, b"alice", &records, &test_address(1)).unwrap();
        assert_eq!(unsigned.signing_inputs, vec![1, 2]);
        let outputs = unsigned.outputs();
        assert_eq!(outputs.len(), 5);
        assert_eq!(extract_op_return_pushes(&outputs[2].locking_bytecode).unwrap(), vec![b"social.twitter=@alice".to_vec()]);
        assert_eq!(extract_op_return_pushes(&outputs[3].locking_bytecode).unwrap(), vec![b"avatar=ipfs://x".to_vec()]);
        assert_eq!(outputs[4].value, 20_000 - unsigned.fee);
    }

    #[test]
    fn test_attach_records_preconditions() {
        let contracts = test_contracts();
        let ctx = BuildContext::new(&TEST_PARAMS, &contracts);
        let (name_utxos, owner_utxos) = name_state(&contracts, 1);
        let long = format!("bio={}", "x".repeat(217));
        assert!(matches!(
            attach_records(&ctx, &name_utxos, &owner_utxos, b"alice", &[long], &test_address(1)),
            Err(Error::Records(RecordsError::RecordTooLong(221)))
        ));
        assert!(attach_records::<&str>(&ctx, &name_utxos, &owner_utxos, b"alice", &[], &test_address(1)).is_err());

        let (name_utxos, stale_owner) = name_state(&contracts, 4);
        assert!(matches!(
            attach_records(&ctx, &name_utxos, &stale_owner, b"alice", &["a=b"], &test_address(1)),
            Err(Error::OwnershipNotFound(_))
        ));
    }
}
