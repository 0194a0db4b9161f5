use crate::BitPath;
use serde::{Deserialize, Serialize};
use starknet_types_core::felt::Felt;

/// A node of the binary Merkle Patricia trie.
///
/// Nodes are addressed by their absolute path from the root, so interior
/// nodes do not carry child pointers: the children of a binary node at path
/// `p` live at `p0` and `p1`, and the child of an edge node at `p` lives at
/// `p` extended by the edge path. This keeps restructuring local: splitting
/// an edge never moves the subtree below it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrieNode {
    /// An interior node with both subtrees present.
    Binary,
    /// A path compressed run of single child interior nodes.
    Edge {
        /// The bits between this node and its child.
        path: BitPath,
    },
    /// A value carrier at the bottom of the trie.
    Leaf {
        /// The value stored under the leaf's path.
        value: Felt,
    },
}
