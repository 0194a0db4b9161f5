//! Pedersen hashing helpers.

use crate::Felt;

pub use starknet_crypto::pedersen_hash;

/// Computes the length suffixed Pedersen fold over a sequence of field
/// elements:
///
/// ```text
/// H(...H(H(0, a0), a1)..., n)
/// ```
///
/// This is the array hash used throughout the StarkNet protocol, notably for
/// transaction signatures and event payloads. The empty sequence hashes to
/// `H(0, 0)`.
pub fn pedersen_array(elements: &[Felt]) -> Felt {
    let hash = elements
        .iter()
        .fold(Felt::ZERO, |acc, element| pedersen_hash(&acc, element));
    pedersen_hash(&hash, &Felt::from(elements.len() as u64))
}
