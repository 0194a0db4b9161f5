//! Helpers generating deterministic, commitment consistent chains for tests.

use crate::{
    crypto::pedersen_hash, proofs, Block, Class, ClassMap, DeployTransaction, DeployedContract,
    Event, Felt, Header, InvokeTransaction, StateDiff, StateUpdate, StorageEntry, Transaction,
    TransactionReceipt,
};

/// Returns the class hash declared by the test block at `number`.
pub fn test_class_hash(number: u64) -> Felt {
    pedersen_hash(&Felt::from(number), &Felt::from(0xc1a5u64))
}

/// Returns the definition blob of the class with the given hash.
pub fn test_class(class_hash: &Felt) -> Class {
    Class { definition: class_hash.to_bytes_be().to_vec() }
}

/// Generates a deterministic chain of `length` blocks.
///
/// Every block carries an invoke and a deploy transaction, aligned receipts
/// with one event, and a state update declaring a fresh class. Blocks after
/// genesis additionally deploy a contract referencing the previous block's
/// class, so resolving a block's class map has to look beyond the declared
/// set. Header commitments are computed from the bodies, making the chain
/// pass `sanity_check_new_height` end to end; block hashes are synthetic
/// (header hash derivation is not part of the model) but properly linked.
pub fn test_chain(length: u64) -> Vec<(Block, StateUpdate, ClassMap)> {
    let mut chain = Vec::with_capacity(length as usize);
    let mut parent_hash = Felt::ZERO;
    let mut parent_root = Felt::ZERO;

    for number in 0..length {
        let declared_class = test_class_hash(number);
        let invoke = InvokeTransaction {
            hash: pedersen_hash(&Felt::from(number), &Felt::ONE),
            contract_address: Felt::from(0xadd0u64),
            entry_point_selector: Felt::from(0x5e1u64),
            calldata: vec![Felt::from(number)],
            signature: vec![Felt::from(number + 1), Felt::from(number + 2)],
            max_fee: Felt::from(1_000_000u64),
            nonce: Felt::from(number),
        };
        let deploy = DeployTransaction {
            hash: pedersen_hash(&Felt::from(number), &Felt::TWO),
            contract_address: pedersen_hash(&Felt::from(number), &Felt::THREE),
            contract_address_salt: Felt::from(number),
            class_hash: declared_class,
            constructor_calldata: vec![],
        };
        let transactions =
            vec![Transaction::Invoke(invoke.clone()), Transaction::Deploy(deploy.clone())];

        let receipts = vec![
            TransactionReceipt {
                transaction_hash: invoke.hash,
                actual_fee: Felt::from(1337u64),
                events: vec![Event {
                    from_address: invoke.contract_address,
                    keys: vec![Felt::from(number)],
                    data: vec![Felt::from(number + 7)],
                }],
            },
            TransactionReceipt {
                transaction_hash: deploy.hash,
                actual_fee: Felt::ZERO,
                events: vec![],
            },
        ];

        let hash = pedersen_hash(&parent_hash, &Felt::from(number));
        let new_root = pedersen_hash(&Felt::from(number), &Felt::from(0x9007u64));
        let header = Header {
            parent_hash,
            number,
            global_state_root: new_root,
            sequencer_address: Felt::from(0x5e90u64),
            timestamp: 1_669_383_496 + number,
            transaction_count: transactions.len() as u64,
            transaction_commitment: proofs::transaction_commitment(&transactions)
                .expect("commitment over generated transactions"),
            event_count: 1,
            event_commitment: proofs::event_commitment(&receipts)
                .expect("commitment over generated receipts"),
            protocol_version: 0,
            extra_data: Felt::ZERO,
            hash,
        };

        let mut deployed_contracts =
            vec![DeployedContract { address: deploy.contract_address, class_hash: declared_class }];
        if number > 0 {
            // reference a class declared by an earlier block
            deployed_contracts.push(DeployedContract {
                address: pedersen_hash(&Felt::from(number), &Felt::from(4u64)),
                class_hash: test_class_hash(number - 1),
            });
        }

        let state_update = StateUpdate {
            block_hash: hash,
            new_root,
            old_root: parent_root,
            state_diff: StateDiff {
                storage_diffs: [(
                    invoke.contract_address,
                    vec![StorageEntry { key: Felt::from(number), value: Felt::from(number + 1) }],
                )]
                .into_iter()
                .collect(),
                deployed_contracts,
                declared_classes: vec![declared_class],
                nonces: [(invoke.contract_address, Felt::from(number + 1))].into_iter().collect(),
                replaced_classes: vec![],
            },
        };

        let classes: ClassMap = state_update
            .state_diff
            .class_hashes()
            .into_iter()
            .map(|class_hash| (class_hash, test_class(&class_hash)))
            .collect();

        chain.push((
            Block { header, transactions, receipts },
            state_update,
            classes,
        ));
        parent_hash = hash;
        parent_root = new_root;
    }
    chain
}
