use crate::DatabaseError;
use std::fmt::Debug;

/// A minimal transactional key-value store.
///
/// Implementations must be safe for concurrent readers and a single writer;
/// batch commits are atomic with respect to readers.
pub trait Database: Send + Sync + Debug {
    /// The write batch type of this store.
    type Batch: Batch;

    /// Returns the value stored under `key`.
    ///
    /// Fails with [`DatabaseError::NotFound`] if the key is absent.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>, DatabaseError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError>;

    /// Removes the value stored under `key`, if any.
    fn delete(&self, key: &[u8]) -> Result<(), DatabaseError>;

    /// Opens a new write batch.
    fn batch(&self) -> Self::Batch;
}

/// A buffered set of writes applied atomically on [`commit`](Self::commit).
///
/// Nothing queued in a batch is visible to readers before the commit, and a
/// failed commit leaves the store untouched.
pub trait Batch: Send {
    /// Queues a write of `value` under `key`.
    fn put(&mut self, key: &[u8], value: &[u8]);

    /// Queues the removal of `key`.
    fn delete(&mut self, key: &[u8]);

    /// Applies all queued operations in one atomic step.
    fn commit(self) -> Result<(), DatabaseError>;
}
