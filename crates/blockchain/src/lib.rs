//! The canonical chain store of skarn.
//!
//! [`Blockchain`] owns the local chain tip and the persistent indices that
//! expose blocks, transactions, receipts and state updates by their various
//! keys. It accepts new blocks under strict chain-linking invariants: only
//! the immediate successor of the current head can be committed, which is
//! what serializes the sync engine's out-of-order verifier completions into
//! a single linear chain.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod error;

pub use error::{BlockchainError, TransactionHashError};

use skarn_db::{tables, Batch, BatchExt, Database, DatabaseError, DatabaseExt};
use skarn_primitives::{
    proofs, Block, BlockHash, BlockNumber, Class, ClassHash, ClassMap, Felt, Network,
    StateCommitment, StateUpdate, Transaction, TransactionReceipt, TxHash,
};

/// The canonical chain store.
///
/// All queries resolve against the persisted head; nothing is cached in
/// memory, so a store reopened over the same database serves the same chain.
#[derive(Clone, Debug)]
pub struct Blockchain<DB> {
    db: DB,
    network: Network,
}

impl<DB: Database> Blockchain<DB> {
    /// Creates a chain store for `network` on top of `db`.
    pub fn new(db: DB, network: Network) -> Self {
        Self { db, network }
    }

    /// Returns the network this chain belongs to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the height of the chain head.
    ///
    /// Fails with [`DatabaseError::NotFound`] if the chain is empty.
    pub fn height(&self) -> Result<BlockNumber, BlockchainError> {
        Ok(self.db.entry::<tables::ChainHeight>(&())?)
    }

    /// Returns the block at the chain head.
    ///
    /// Fails with [`DatabaseError::NotFound`] if the chain is empty.
    pub fn head(&self) -> Result<Block, BlockchainError> {
        let height = self.height()?;
        self.block_by_number(height)
    }

    /// Returns the global state commitment at the chain head.
    ///
    /// Fails with [`DatabaseError::NotFound`] if the chain is empty.
    pub fn state_commitment(&self) -> Result<StateCommitment, BlockchainError> {
        let height = self.height()?;
        Ok(self.state_update_by_number(height)?.new_root)
    }

    /// Returns the block with the given number.
    pub fn block_by_number(&self, number: BlockNumber) -> Result<Block, BlockchainError> {
        Ok(self.db.entry::<tables::BlockByNumber>(&number)?)
    }

    /// Returns the block with the given hash.
    pub fn block_by_hash(&self, hash: &BlockHash) -> Result<Block, BlockchainError> {
        let number = self.db.entry::<tables::BlockHashToNumber>(hash)?;
        self.block_by_number(number)
    }

    /// Returns the transaction with the given hash.
    pub fn transaction_by_hash(&self, hash: &TxHash) -> Result<Transaction, BlockchainError> {
        let (number, index) = self.db.entry::<tables::TxByHash>(hash)?;
        self.transaction_by_block_number_and_index(number, index)
    }

    /// Returns the transaction at `index` within the block at `number`.
    pub fn transaction_by_block_number_and_index(
        &self,
        number: BlockNumber,
        index: u64,
    ) -> Result<Transaction, BlockchainError> {
        Ok(self.db.entry::<tables::TxByBlockAndIndex>(&(number, index))?)
    }

    /// Returns the receipt of the transaction with the given hash.
    pub fn receipt_by_hash(&self, hash: &TxHash) -> Result<TransactionReceipt, BlockchainError> {
        Ok(self.db.entry::<tables::ReceiptByTxHash>(hash)?)
    }

    /// Returns the state update of the block with the given number.
    pub fn state_update_by_number(
        &self,
        number: BlockNumber,
    ) -> Result<StateUpdate, BlockchainError> {
        Ok(self.db.entry::<tables::StateUpdateByNumber>(&number)?)
    }

    /// Returns the state update of the block with the given hash.
    pub fn state_update_by_hash(&self, hash: &BlockHash) -> Result<StateUpdate, BlockchainError> {
        let number = self.db.entry::<tables::BlockHashToNumber>(hash)?;
        self.state_update_by_number(number)
    }

    /// Returns the class definition with the given hash.
    pub fn class_by_hash(&self, hash: &ClassHash) -> Result<Class, BlockchainError> {
        Ok(self.db.entry::<tables::ClassByHash>(hash)?)
    }

    /// Checks that `block` links onto the current chain head.
    ///
    /// An empty chain only accepts block 0 with a zero parent hash; a
    /// non-empty chain only accepts the immediate successor of its head.
    pub fn verify_block(&self, block: &Block) -> Result<(), BlockchainError> {
        let head = match self.head() {
            Ok(head) => head,
            Err(BlockchainError::Database(DatabaseError::NotFound)) => {
                if block.number() != 0 {
                    return Err(BlockchainError::IncompatibleBlock(
                        "cannot insert a block with number more than 0 in an empty blockchain",
                    ));
                }
                if block.parent_hash() != Felt::ZERO {
                    return Err(BlockchainError::IncompatibleBlock(
                        "cannot insert a block with non-zero parent hash in an empty blockchain",
                    ));
                }
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if block.number() != head.number() + 1 {
            return Err(BlockchainError::IncompatibleBlock(
                "block number difference between head and incoming block is not 1",
            ));
        }
        if block.parent_hash() != head.hash() {
            return Err(BlockchainError::IncompatibleBlock(
                "block's parent hash does not match head block hash",
            ));
        }
        Ok(())
    }

    /// Runs every consistency check a new `(block, state update)` pair has
    /// to pass before being committed.
    ///
    /// On top of [`verify_block`](Self::verify_block) this checks that the
    /// state update belongs to the block, and recomputes the transaction and
    /// event commitments from the block body to compare them against the
    /// header.
    pub fn sanity_check_new_height(
        &self,
        block: &Block,
        state_update: &StateUpdate,
    ) -> Result<(), BlockchainError> {
        self.verify_block(block)?;

        if state_update.block_hash != block.hash() {
            return Err(BlockchainError::IncompatibleBlockAndStateUpdate(
                "block hashes do not match",
            ));
        }
        if state_update.new_root != block.header.global_state_root {
            return Err(BlockchainError::IncompatibleBlockAndStateUpdate(
                "block's GlobalStateRoot does not match state update's NewRoot",
            ));
        }

        verify_transaction_hashes(block)?;

        if proofs::transaction_commitment(&block.transactions)?
            != block.header.transaction_commitment
        {
            return Err(BlockchainError::IncompatibleBlockAndStateUpdate("commitment mismatch"));
        }
        if proofs::event_commitment(&block.receipts)? != block.header.event_commitment {
            return Err(BlockchainError::IncompatibleBlockAndStateUpdate("commitment mismatch"));
        }
        Ok(())
    }

    /// Commits a block, its state update and the classes it references.
    ///
    /// The chain-linking predicate is rechecked under the write path: sanity
    /// checks run concurrently in the sync engine, so linkage has to hold at
    /// the moment of the commit, not just at check time. All index writes
    /// form one batch; either the whole block becomes visible or none of it.
    pub fn store(
        &self,
        block: &Block,
        state_update: &StateUpdate,
        classes: &ClassMap,
    ) -> Result<(), BlockchainError> {
        self.verify_block(block)?;

        let number = block.number();
        let mut batch = self.db.batch();
        batch.put_entry::<tables::BlockByNumber>(&number, block)?;
        batch.put_entry::<tables::BlockHashToNumber>(&block.hash(), &number)?;
        batch.put_entry::<tables::StateUpdateByNumber>(&number, state_update)?;

        for (index, transaction) in block.transactions.iter().enumerate() {
            let location = (number, index as u64);
            batch.put_entry::<tables::TxByHash>(&transaction.hash(), &location)?;
            batch.put_entry::<tables::TxByBlockAndIndex>(&location, transaction)?;
        }
        for receipt in &block.receipts {
            batch.put_entry::<tables::ReceiptByTxHash>(&receipt.transaction_hash, receipt)?;
        }
        for (class_hash, class) in classes {
            if !self.db.contains::<tables::ClassByHash>(class_hash)? {
                batch.put_entry::<tables::ClassByHash>(class_hash, class)?;
            }
        }

        batch.put_entry::<tables::ChainHeight>(&(), &number)?;
        batch.commit()?;
        Ok(())
    }
}

/// Checks that every transaction hash of the block can be re-derived.
///
/// Per-type hash derivation is versioned and not modelled here; the
/// structural requirement is that a transaction carries a hash at all. The
/// zero sentinel cannot be re-derived or matched against anything.
fn verify_transaction_hashes(block: &Block) -> Result<(), BlockchainError> {
    for transaction in &block.transactions {
        let hash = transaction.hash();
        if hash == Felt::ZERO {
            return Err(BlockchainError::CantVerifyTransactionHash {
                hash,
                source: TransactionHashError::MissingHash,
            });
        }
    }
    Ok(())
}
