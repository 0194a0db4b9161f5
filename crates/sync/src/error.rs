use skarn_blockchain::BlockchainError;
use skarn_primitives::BlockNumber;

/// A failure of the sync pipeline at a specific height.
///
/// Emitted by verifiers on the failure channel; receiving one cancels the
/// current pipeline epoch and rolls the engine back. No stored data is
/// removed by a rollback.
#[derive(Debug, thiserror::Error)]
#[error("sync failed on block #{height} with {error}")]
pub struct SyncFailure {
    /// The height the pipeline failed at.
    pub height: BlockNumber,
    /// The verification or storage error that stopped the pipeline.
    pub error: BlockchainError,
}
