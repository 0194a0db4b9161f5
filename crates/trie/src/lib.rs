//! A height bounded binary Merkle Patricia trie.
//!
//! StarkNet commitments are defined as the roots of height 64 binary
//! Patricia tries whose leaves are indexed by sequence position. The root of
//! such a trie differs from a plain power-of-two Merkle tree whenever the
//! leaf count is not a full `2^64`, so the tree shape implemented here has to
//! match the protocol definition bit for bit:
//!
//! * a leaf hashes to its value,
//! * a binary node hashes to `H(left, right)`,
//! * an edge node hashes to `H(child, path) + path_length`,
//! * the empty trie hashes to the zero field element.
//!
//! Nodes live in a [`TrieStorage`] backend keyed by their absolute path from
//! the root. The in-memory backend is all the commitment computation needs:
//! the trie is built, hashed once, and dropped.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod errors;
mod node;
mod path;
mod storage;
mod trie;

pub use errors::TrieError;
pub use node::TrieNode;
pub use path::BitPath;
pub use storage::{InMemoryStorage, TrieStorage};
pub use trie::MerkleTrie;
