use skarn_db::DatabaseError;
use skarn_primitives::TxHash;
use skarn_trie::TrieError;

/// Errors surfaced by the [`Blockchain`](crate::Blockchain) store.
#[derive(Debug, thiserror::Error)]
pub enum BlockchainError {
    /// Underlying key-value store failure, including missing records.
    #[error(transparent)]
    Database(#[from] DatabaseError),
    /// Commitment recomputation failed inside the trie.
    #[error(transparent)]
    Trie(#[from] TrieError),
    /// The block header does not link onto the current chain head.
    #[error("{0}")]
    IncompatibleBlock(&'static str),
    /// The block and its state update do not describe the same chain step.
    #[error("{0}")]
    IncompatibleBlockAndStateUpdate(&'static str),
    /// A transaction's hash cannot be recomputed from its contents.
    ///
    /// The sync layer treats this kind as non-fatal: it is expected for some
    /// historical blocks and must not stop the chain from advancing.
    #[error("cannot verify hash of transaction {hash:#x}")]
    CantVerifyTransactionHash {
        /// The hash carried by the offending transaction.
        hash: TxHash,
        /// Why the hash could not be recomputed.
        #[source]
        source: TransactionHashError,
    },
}

/// Reasons a transaction hash cannot be recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransactionHashError {
    /// The transaction carries the zero sentinel instead of a hash.
    #[error("transaction hash is the zero sentinel")]
    MissingHash,
}
