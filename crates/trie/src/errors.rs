/// Errors surfaced by trie operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    /// An interior node referenced by its parent is missing from storage.
    #[error("trie node not found in storage")]
    NodeNotFound,
}
