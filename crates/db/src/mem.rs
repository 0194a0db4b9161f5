//! In-memory database backend.

use crate::{Batch, Database, DatabaseError};
use parking_lot::RwLock;
use std::{collections::BTreeMap, sync::Arc};

/// An in-memory [`Database`] backed by a [`BTreeMap`].
///
/// Cloning the handle shares the underlying store, which is how tests model
/// closing and reopening a database. Reads take a shared lock; point writes
/// and batch commits take the exclusive lock, so a batch is applied
/// atomically with respect to every reader.
#[derive(Clone, Debug, Default)]
pub struct MemDatabase {
    inner: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemDatabase {
    /// Creates an empty in-memory database.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Database for MemDatabase {
    type Batch = MemBatch;

    fn get(&self, key: &[u8]) -> Result<Vec<u8>, DatabaseError> {
        self.inner.read().get(key).cloned().ok_or(DatabaseError::NotFound)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError> {
        self.inner.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), DatabaseError> {
        self.inner.write().remove(key);
        Ok(())
    }

    fn batch(&self) -> Self::Batch {
        MemBatch { inner: Arc::clone(&self.inner), ops: Vec::new() }
    }
}

/// A write batch of a [`MemDatabase`].
#[derive(Debug)]
pub struct MemBatch {
    inner: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
    ops: Vec<BatchOp>,
}

#[derive(Debug)]
enum BatchOp {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

impl Batch for MemBatch {
    fn put(&mut self, key: &[u8], value: &[u8]) {
        self.ops.push(BatchOp::Put(key.to_vec(), value.to_vec()));
    }

    fn delete(&mut self, key: &[u8]) {
        self.ops.push(BatchOp::Delete(key.to_vec()));
    }

    fn commit(self) -> Result<(), DatabaseError> {
        let mut store = self.inner.write();
        for op in self.ops {
            match op {
                BatchOp::Put(key, value) => {
                    store.insert(key, value);
                }
                BatchOp::Delete(key) => {
                    store.remove(&key);
                }
            }
        }
        Ok(())
    }
}
