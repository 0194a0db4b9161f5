use async_trait::async_trait;
use skarn_primitives::{Block, BlockNumber, Class, ClassHash, StateUpdate};

/// A source of canonical StarkNet data, typically a feeder gateway client.
///
/// The sync engine treats every error returned here as transient and keeps
/// retrying; a source must reject unknown or not yet produced heights with an
/// error rather than answering with a stub.
#[async_trait]
pub trait StarknetData: Send + Sync {
    /// Fetches the block at the given height.
    async fn block_by_number(&self, number: BlockNumber) -> Result<Block, DataError>;

    /// Fetches the state update of the block at the given height.
    async fn state_update(&self, number: BlockNumber) -> Result<StateUpdate, DataError>;

    /// Fetches the class definition with the given hash.
    async fn class(&self, hash: &ClassHash) -> Result<Class, DataError>;
}

/// Errors returned by a [`StarknetData`] source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// The requested block does not exist upstream (yet).
    #[error("block #{0} not found")]
    BlockNotFound(BlockNumber),
    /// The requested class definition does not exist upstream.
    #[error("class {0:#x} not found")]
    ClassNotFound(ClassHash),
    /// The request failed in transit or upstream answered malformed data.
    #[error("upstream request failed: {0}")]
    Transport(String),
}
