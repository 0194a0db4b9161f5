use crate::{BlockHash, BlockNumber, Felt, StateCommitment, Transaction, TransactionReceipt};
use serde::{Deserialize, Serialize};

/// A StarkNet block header as served by the feeder gateway.
///
/// Header hash recomputation is not attempted: [`Header::hash`] is carried
/// verbatim from the upstream source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The hash of this block's parent.
    pub parent_hash: BlockHash,
    /// The number (height) of this block.
    pub number: BlockNumber,
    /// The state commitment after this block.
    pub global_state_root: StateCommitment,
    /// The StarkNet address of the sequencer who created this block.
    pub sequencer_address: Felt,
    /// The time the sequencer created this block before executing transactions.
    pub timestamp: u64,
    /// The number of transactions in the block.
    pub transaction_count: u64,
    /// A commitment to the transactions included in the block.
    pub transaction_commitment: Felt,
    /// The number of events produced in this block.
    pub event_count: u64,
    /// A commitment to the events produced in this block.
    pub event_commitment: Felt,
    /// The version of the StarkNet protocol used when creating this block.
    pub protocol_version: u64,
    /// Extraneous data that might be useful for running transactions.
    pub extra_data: Felt,
    /// The hash of this block.
    pub hash: BlockHash,
}

/// A StarkNet block.
///
/// The receipt sequence is aligned by index with the transaction sequence.
/// `header.transaction_count` equals `transactions.len()` and
/// `header.event_count` equals the total number of events across all
/// receipts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block header.
    pub header: Header,
    /// The transactions included in the block, in execution order.
    pub transactions: Vec<Transaction>,
    /// The receipts of the included transactions, aligned by index.
    pub receipts: Vec<TransactionReceipt>,
}

impl Block {
    /// Returns the block number.
    pub fn number(&self) -> BlockNumber {
        self.header.number
    }

    /// Returns the block hash.
    pub fn hash(&self) -> BlockHash {
        self.header.hash
    }

    /// Returns the hash of the parent block.
    pub fn parent_hash(&self) -> BlockHash {
        self.header.parent_hash
    }
}
