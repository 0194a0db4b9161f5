//! Declaration of all tables of the chain store.

use skarn_primitives::{Block, Class, StateUpdate, Transaction, TransactionReceipt};
use starknet_types_core::felt::Felt;

/// Declares a table: its tag, key type and value type.
macro_rules! table {
    ($(#[$docs:meta])+ ( $name:ident, $tag:literal ) $key:ty => $value:ty) => {
        $(#[$docs])+
        ///
        #[doc = concat!("Takes [`", stringify!($key), "`] as a key and stores [`", stringify!($value), "`].")]
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl $crate::Table for $name {
            const NAME: &'static str = stringify!($name);
            const TAG: u8 = $tag;
            type Key = $key;
            type Value = $value;
        }
    };
}

table!(
    /// Canonical blocks, indexed by block number.
    ( BlockByNumber, 0x00 ) u64 => Block
);

table!(
    /// Block hash to block number index.
    ( BlockHashToNumber, 0x01 ) Felt => u64
);

table!(
    /// State updates, indexed by the number of the block they belong to.
    ( StateUpdateByNumber, 0x02 ) u64 => StateUpdate
);

table!(
    /// Transaction hash to `(block number, index)` location.
    ( TxByHash, 0x03 ) Felt => (u64, u64)
);

table!(
    /// Transaction bodies, indexed by `(block number, index)`.
    ( TxByBlockAndIndex, 0x04 ) (u64, u64) => Transaction
);

table!(
    /// Transaction receipts, indexed by transaction hash.
    ( ReceiptByTxHash, 0x05 ) Felt => TransactionReceipt
);

table!(
    /// Contract class definitions, indexed by class hash.
    ///
    /// Written only if the hash is not already present: class definitions
    /// are content addressed and may be referenced by many blocks.
    ( ClassByHash, 0x06 ) Felt => Class
);

table!(
    /// The height of the chain head. A single entry under the bare tag.
    ( ChainHeight, 0x07 ) () => u64
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::storage_key;

    #[test]
    fn keys_are_tag_prefixed_big_endian() {
        assert_eq!(
            storage_key::<BlockByNumber>(&1),
            vec![0x00, 0, 0, 0, 0, 0, 0, 0, 1]
        );
        assert_eq!(
            storage_key::<TxByBlockAndIndex>(&(2, 3)),
            vec![0x04, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 3]
        );
        assert_eq!(storage_key::<ChainHeight>(&()), vec![0x07]);

        let felt_key = storage_key::<BlockHashToNumber>(&Felt::from(0xffu64));
        assert_eq!(felt_key.len(), 33);
        assert_eq!(felt_key[0], 0x01);
        assert_eq!(felt_key[32], 0xff);
    }

    #[test]
    fn tags_are_unique() {
        use crate::Table;
        let tags = [
            BlockByNumber::TAG,
            BlockHashToNumber::TAG,
            StateUpdateByNumber::TAG,
            TxByHash::TAG,
            TxByBlockAndIndex::TAG,
            ReceiptByTxHash::TAG,
            ClassByHash::TAG,
            ChainHeight::TAG,
        ];
        let mut deduped = tags.to_vec();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), tags.len());
    }
}
