use crate::{BitPath, TrieError, TrieNode, TrieStorage};
use starknet_crypto::pedersen_hash;
use starknet_types_core::felt::Felt;

/// A height bounded binary Merkle Patricia trie over a [`TrieStorage`]
/// backend.
///
/// Keys are field elements truncated to the low `height` bits of their binary
/// expansion, walked most significant bit first. Interior structure is path
/// compressed: runs of single child nodes are stored as one edge.
#[derive(Debug)]
pub struct MerkleTrie<S> {
    storage: S,
    height: u8,
}

impl<S: TrieStorage> MerkleTrie<S> {
    /// Creates a trie of the given height on top of `storage`.
    ///
    /// # Panics
    ///
    /// Panics if `height` exceeds 64 bits.
    pub fn new(storage: S, height: u8) -> Self {
        assert!(height <= 64, "trie height is limited to 64 bits");
        Self { storage, height }
    }

    /// Inserts or replaces the value stored under `key`.
    pub fn put(&mut self, key: &Felt, value: Felt) -> Result<(), TrieError> {
        let key_path = BitPath::from_felt(key, self.height);
        let mut position = BitPath::EMPTY;
        loop {
            let node = match self.storage.get(&position) {
                Some(node) => node,
                None if position.is_empty() => {
                    // empty trie: a single edge straight down to the new leaf
                    if self.height == 0 {
                        self.storage.put(BitPath::EMPTY, TrieNode::Leaf { value });
                    } else {
                        self.storage.put(BitPath::EMPTY, TrieNode::Edge { path: key_path });
                        self.storage.put(key_path, TrieNode::Leaf { value });
                    }
                    return Ok(());
                }
                None => return Err(TrieError::NodeNotFound),
            };
            match node {
                TrieNode::Leaf { .. } => {
                    self.storage.put(position, TrieNode::Leaf { value });
                    return Ok(());
                }
                TrieNode::Binary => {
                    position = position.child(key_path.bit(position.len()));
                }
                TrieNode::Edge { path: edge } => {
                    let remaining = key_path.slice(position.len(), self.height);
                    let common = edge.common_prefix_len(&remaining);
                    if common == edge.len() {
                        position = position.extend(&edge);
                    } else {
                        self.split_edge(position, edge, common, key_path, value);
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Splits the edge at `position` where the new key diverges from it at
    /// `common` bits, inserting a binary fork with the existing subtree on
    /// one side and the new leaf on the other.
    fn split_edge(
        &mut self,
        position: BitPath,
        edge: BitPath,
        common: u8,
        key_path: BitPath,
        value: Felt,
    ) {
        let prefix = edge.slice(0, common);
        let fork = position.extend(&prefix);

        // Descendants are keyed by absolute path and stay where they are;
        // only a shortened edge needs to be written when bits remain between
        // the fork and the existing child.
        let old_bit = edge.bit(common);
        let old_tail = edge.slice(common + 1, edge.len());
        if !old_tail.is_empty() {
            self.storage.put(fork.child(old_bit), TrieNode::Edge { path: old_tail });
        }

        let new_child = fork.child(1 - old_bit);
        if new_child.len() == self.height {
            self.storage.put(new_child, TrieNode::Leaf { value });
        } else {
            let new_tail = key_path.slice(new_child.len(), self.height);
            self.storage.put(new_child, TrieNode::Edge { path: new_tail });
            self.storage.put(key_path, TrieNode::Leaf { value });
        }

        self.storage.put(fork, TrieNode::Binary);
        if common > 0 {
            self.storage.put(position, TrieNode::Edge { path: prefix });
        }
    }

    /// Removes the value stored under `key`, collapsing the degenerate
    /// binary node this leaves behind back into an edge. Removing an absent
    /// key is a no-op.
    pub fn delete(&mut self, key: &Felt) -> Result<(), TrieError> {
        let key_path = BitPath::from_felt(key, self.height);
        let mut ancestors: Vec<(BitPath, TrieNode)> = Vec::new();
        let mut position = BitPath::EMPTY;
        loop {
            let node = match self.storage.get(&position) {
                Some(node) => node,
                None if position.is_empty() => return Ok(()),
                None => return Err(TrieError::NodeNotFound),
            };
            match node {
                TrieNode::Leaf { .. } => break,
                TrieNode::Binary => {
                    ancestors.push((position, TrieNode::Binary));
                    position = position.child(key_path.bit(position.len()));
                }
                TrieNode::Edge { path: edge } => {
                    let remaining = key_path.slice(position.len(), self.height);
                    if edge.common_prefix_len(&remaining) < edge.len() {
                        return Ok(());
                    }
                    ancestors.push((position, TrieNode::Edge { path: edge }));
                    position = position.extend(&edge);
                }
            }
        }
        self.storage.delete(&position);

        // drop the edge that led straight to the removed leaf, if any
        if matches!(ancestors.last(), Some((_, TrieNode::Edge { .. }))) {
            if let Some((edge_position, _)) = ancestors.pop() {
                self.storage.delete(&edge_position);
            }
        }
        match ancestors.pop() {
            Some((fork, _)) => self.collapse(fork, key_path, ancestors.pop()),
            // the removed leaf was the only entry
            None => Ok(()),
        }
    }

    /// Replaces the binary node at `fork`, which just lost the child on the
    /// key side, with an edge to its surviving child, merging with the
    /// surviving child's edge below and the parent edge above.
    fn collapse(
        &mut self,
        fork: BitPath,
        key_path: BitPath,
        parent: Option<(BitPath, TrieNode)>,
    ) -> Result<(), TrieError> {
        let surviving_bit = 1 - key_path.bit(fork.len());
        let surviving = fork.child(surviving_bit);
        let mut tail = BitPath::EMPTY.child(surviving_bit);
        if let TrieNode::Edge { path } =
            self.storage.get(&surviving).ok_or(TrieError::NodeNotFound)?
        {
            // the surviving edge folds into the new one; its child keeps its
            // storage key
            self.storage.delete(&surviving);
            tail = tail.extend(&path);
        }
        match parent {
            Some((parent_position, TrieNode::Edge { path })) => {
                self.storage.delete(&fork);
                self.storage.put(parent_position, TrieNode::Edge { path: path.extend(&tail) });
            }
            _ => {
                self.storage.put(fork, TrieNode::Edge { path: tail });
            }
        }
        Ok(())
    }

    /// Returns the root commitment of the trie.
    ///
    /// The empty trie commits to the zero field element.
    pub fn root(&self) -> Result<Felt, TrieError> {
        match self.storage.get(&BitPath::EMPTY) {
            None => Ok(Felt::ZERO),
            Some(_) => self.hash_of(BitPath::EMPTY),
        }
    }

    fn hash_of(&self, position: BitPath) -> Result<Felt, TrieError> {
        let node = self.storage.get(&position).ok_or(TrieError::NodeNotFound)?;
        match node {
            TrieNode::Leaf { value } => Ok(value),
            TrieNode::Binary => {
                let left = self.hash_of(position.child(0))?;
                let right = self.hash_of(position.child(1))?;
                Ok(pedersen_hash(&left, &right))
            }
            TrieNode::Edge { path } => {
                let child = self.hash_of(position.extend(&path))?;
                Ok(pedersen_hash(&child, &path.to_felt()) + Felt::from(path.len()))
            }
        }
    }
}
