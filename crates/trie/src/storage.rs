use crate::{BitPath, TrieNode};
use std::collections::HashMap;

/// Backing storage for a [`MerkleTrie`](crate::MerkleTrie).
///
/// Keys are absolute node paths. A miss is reported as `None`; the trie
/// surfaces misses on structurally required nodes as
/// [`TrieError::NodeNotFound`](crate::TrieError) rather than treating them as
/// unreachable.
pub trait TrieStorage {
    /// Returns the node stored at `key`.
    fn get(&self, key: &BitPath) -> Option<TrieNode>;

    /// Stores `node` under `key`, replacing any previous node.
    fn put(&mut self, key: BitPath, node: TrieNode);

    /// Removes the node stored at `key`, if any.
    fn delete(&mut self, key: &BitPath);
}

/// Transient trie storage keeping all nodes in memory.
///
/// This is the backend used for commitment computation: the nodes are owned
/// by the map and freed together when the trie is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    nodes: HashMap<BitPath, TrieNode>,
}

impl InMemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrieStorage for InMemoryStorage {
    fn get(&self, key: &BitPath) -> Option<TrieNode> {
        self.nodes.get(key).cloned()
    }

    fn put(&mut self, key: BitPath, node: TrieNode) {
        self.nodes.insert(key, node);
    }

    fn delete(&mut self, key: &BitPath) {
        self.nodes.remove(key);
    }
}
