//! Merkle Patricia commitments binding a block header to its contents.

use crate::{crypto, Felt, Transaction, TransactionReceipt};
use skarn_trie::{InMemoryStorage, MerkleTrie, TrieError};
use starknet_crypto::pedersen_hash;

/// The height of the commitment tries defined by the StarkNet protocol.
pub const COMMITMENT_TRIE_HEIGHT: u8 = 64;

/// Computes the transaction commitment of a block.
///
/// The commitment is the root of a height 64 binary Merkle Patricia trie
/// whose leaf at index `i` is `H(hash_i, signature_hash_i)`. Only invoke
/// transactions contribute their actual signature; every other variant hashes
/// the placeholder `H(0, 0)`, matching the feeder gateway's header
/// convention.
pub fn transaction_commitment(transactions: &[Transaction]) -> Result<Felt, TrieError> {
    let mut trie = MerkleTrie::new(InMemoryStorage::new(), COMMITMENT_TRIE_HEIGHT);
    let empty_signature_hash = pedersen_hash(&Felt::ZERO, &Felt::ZERO);

    for (index, transaction) in transactions.iter().enumerate() {
        let signature_hash = match transaction {
            Transaction::Invoke(tx) => crypto::pedersen_array(&tx.signature),
            _ => empty_signature_hash,
        };
        let leaf = pedersen_hash(&transaction.hash(), &signature_hash);
        trie.put(&Felt::from(index as u64), leaf)?;
    }
    trie.root()
}

/// Computes the event commitment of a block.
///
/// All events of the block's receipts are flattened in order and indexed by
/// their running position; the leaf of an event is
/// `H([from_address, H(keys), H(data)])` with the length suffixed array
/// hash. A block without events commits to the zero field element.
pub fn event_commitment(receipts: &[TransactionReceipt]) -> Result<Felt, TrieError> {
    let mut trie = MerkleTrie::new(InMemoryStorage::new(), COMMITMENT_TRIE_HEIGHT);

    let mut index = 0u64;
    for receipt in receipts {
        for event in &receipt.events {
            let keys_hash = crypto::pedersen_array(&event.keys);
            let data_hash = crypto::pedersen_array(&event.data);
            let leaf =
                crypto::pedersen_array(&[event.from_address, keys_hash, data_hash]);
            trie.put(&Felt::from(index), leaf)?;
            index += 1;
        }
    }
    trie.root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeployTransaction, Event, InvokeTransaction};

    fn edge_hash(child: Felt, path_bits: u64, path_len: u8) -> Felt {
        pedersen_hash(&child, &Felt::from(path_bits)) + Felt::from(path_len)
    }

    #[test]
    fn empty_block_commits_to_zero() {
        assert_eq!(transaction_commitment(&[]), Ok(Felt::ZERO));
        assert_eq!(event_commitment(&[]), Ok(Felt::ZERO));
    }

    #[test]
    fn invoke_transactions_contribute_their_signature() {
        let signature = vec![Felt::from(11u64), Felt::from(22u64)];
        let transaction = Transaction::Invoke(InvokeTransaction {
            hash: Felt::from(0xdeadu64),
            signature: signature.clone(),
            ..Default::default()
        });

        let leaf = pedersen_hash(
            &Felt::from(0xdeadu64),
            &crypto::pedersen_array(&signature),
        );
        let expected = edge_hash(leaf, 0, COMMITMENT_TRIE_HEIGHT);
        assert_eq!(transaction_commitment(&[transaction]), Ok(expected));
    }

    #[test]
    fn other_transactions_hash_the_signature_placeholder() {
        let transaction = Transaction::Deploy(DeployTransaction {
            hash: Felt::from(0xbeefu64),
            ..Default::default()
        });

        let leaf = pedersen_hash(
            &Felt::from(0xbeefu64),
            &pedersen_hash(&Felt::ZERO, &Felt::ZERO),
        );
        let expected = edge_hash(leaf, 0, COMMITMENT_TRIE_HEIGHT);
        assert_eq!(transaction_commitment(&[transaction]), Ok(expected));
    }

    #[test]
    fn sibling_leaves_fork_over_the_index_bit() {
        let transactions = vec![
            Transaction::Deploy(DeployTransaction {
                hash: Felt::from(1u64),
                ..Default::default()
            }),
            Transaction::Deploy(DeployTransaction {
                hash: Felt::from(2u64),
                ..Default::default()
            }),
        ];

        let placeholder = pedersen_hash(&Felt::ZERO, &Felt::ZERO);
        let leaf_0 = pedersen_hash(&Felt::from(1u64), &placeholder);
        let leaf_1 = pedersen_hash(&Felt::from(2u64), &placeholder);
        let expected = edge_hash(pedersen_hash(&leaf_0, &leaf_1), 0, 63);
        assert_eq!(transaction_commitment(&transactions), Ok(expected));
    }

    #[test]
    fn events_are_indexed_across_receipts() {
        let event = |seed: u64| Event {
            from_address: Felt::from(seed),
            keys: vec![Felt::from(seed + 1)],
            data: vec![Felt::from(seed + 2), Felt::from(seed + 3)],
        };
        let split = vec![
            TransactionReceipt { events: vec![event(10)], ..Default::default() },
            TransactionReceipt { events: vec![event(20)], ..Default::default() },
        ];
        let merged = vec![TransactionReceipt {
            events: vec![event(10), event(20)],
            ..Default::default()
        }];

        // the running index only depends on the flattened event order
        assert_eq!(event_commitment(&split), event_commitment(&merged));

        let leaf = |seed: u64| {
            crypto::pedersen_array(&[
                Felt::from(seed),
                crypto::pedersen_array(&[Felt::from(seed + 1)]),
                crypto::pedersen_array(&[Felt::from(seed + 2), Felt::from(seed + 3)]),
            ])
        };
        let fork = pedersen_hash(&leaf(10), &leaf(20));
        assert_eq!(event_commitment(&split), Ok(edge_hash(fork, 0, 63)));
    }

    #[test]
    fn commitments_are_idempotent() {
        let transactions = vec![Transaction::Invoke(InvokeTransaction {
            hash: Felt::from(0x1234u64),
            signature: vec![Felt::from(9u64)],
            ..Default::default()
        })];
        assert_eq!(
            transaction_commitment(&transactions),
            transaction_commitment(&transactions)
        );
    }
}
