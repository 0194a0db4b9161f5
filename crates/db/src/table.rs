use crate::{Batch, Database, DatabaseError};
use serde::{de::DeserializeOwned, Serialize};
use starknet_types_core::felt::Felt;

/// A table of the chain store.
///
/// A table is a typed view over the flat keyspace: its [`TAG`](Self::TAG) is
/// the first byte of every key it owns, followed by the big endian encoding
/// of the typed key. Values are serialized with bincode.
pub trait Table: Send + Sync + 'static {
    /// The name of the table, used in error messages.
    const NAME: &'static str;
    /// The one byte namespace tag of the table.
    const TAG: u8;
    /// The key type of the table.
    type Key: Encode;
    /// The value type of the table.
    type Value: Serialize + DeserializeOwned + Send + Sync;
}

/// Big endian key encoding.
///
/// Keys sort byte-wise in their natural order, which keeps the on-disk
/// layout inspectable and range-scannable by external tooling.
pub trait Encode {
    /// The encoded representation of the key.
    type Encoded: AsRef<[u8]>;

    /// Encodes the key.
    fn encode(&self) -> Self::Encoded;
}

impl Encode for u64 {
    type Encoded = [u8; 8];

    fn encode(&self) -> Self::Encoded {
        self.to_be_bytes()
    }
}

impl Encode for Felt {
    type Encoded = [u8; 32];

    fn encode(&self) -> Self::Encoded {
        self.to_bytes_be()
    }
}

impl Encode for (u64, u64) {
    type Encoded = [u8; 16];

    fn encode(&self) -> Self::Encoded {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.0.to_be_bytes());
        bytes[8..].copy_from_slice(&self.1.to_be_bytes());
        bytes
    }
}

impl Encode for () {
    type Encoded = [u8; 0];

    fn encode(&self) -> Self::Encoded {
        []
    }
}

/// Builds the full storage key of an entry: the table tag followed by the
/// encoded key.
pub(crate) fn storage_key<T: Table>(key: &T::Key) -> Vec<u8> {
    let encoded = key.encode();
    let mut bytes = Vec::with_capacity(1 + encoded.as_ref().len());
    bytes.push(T::TAG);
    bytes.extend_from_slice(encoded.as_ref());
    bytes
}

/// Typed table reads over any [`Database`].
pub trait DatabaseExt: Database {
    /// Returns the value stored for `key` in table `T`.
    ///
    /// Fails with [`DatabaseError::NotFound`] if the entry is absent.
    fn entry<T: Table>(&self, key: &T::Key) -> Result<T::Value, DatabaseError> {
        let bytes = self.get(&storage_key::<T>(key))?;
        bincode::deserialize(&bytes).map_err(|_| DatabaseError::Decode(T::NAME))
    }

    /// Returns whether table `T` has an entry for `key`.
    fn contains<T: Table>(&self, key: &T::Key) -> Result<bool, DatabaseError> {
        match self.get(&storage_key::<T>(key)) {
            Ok(_) => Ok(true),
            Err(DatabaseError::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

impl<DB: Database> DatabaseExt for DB {}

/// Typed table writes over any [`Batch`].
pub trait BatchExt: Batch {
    /// Queues a write of `value` for `key` in table `T`.
    fn put_entry<T: Table>(&mut self, key: &T::Key, value: &T::Value) -> Result<(), DatabaseError> {
        let bytes = bincode::serialize(value).map_err(|_| DatabaseError::Encode(T::NAME))?;
        self.put(&storage_key::<T>(key), &bytes);
        Ok(())
    }
}

impl<B: Batch> BatchExt for B {}
