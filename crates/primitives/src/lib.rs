//! Commonly used types for skarn.
//!
//! This crate contains the StarkNet domain model shared by the storage,
//! blockchain and sync crates: blocks and their bodies, state updates,
//! contract classes, the network identifier, and the Pedersen based
//! commitment builders that bind a block header to its contents.

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

mod block;
mod class;
pub mod crypto;
mod network;
pub mod proofs;
mod receipt;
mod state_update;
mod transaction;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use block::{Block, Header};
pub use class::{Class, ClassMap};
pub use network::Network;
pub use receipt::{Event, TransactionReceipt};
pub use state_update::{DeployedContract, StateDiff, StateUpdate, StorageEntry};
pub use transaction::{
    DeclareTransaction, DeployAccountTransaction, DeployTransaction, InvokeTransaction,
    L1HandlerTransaction, Transaction,
};

pub use starknet_types_core::felt::Felt;

/// A block number.
pub type BlockNumber = u64;

/// A block hash.
pub type BlockHash = Felt;

/// A transaction hash.
pub type TxHash = Felt;

/// The hash of a contract class definition.
pub type ClassHash = Felt;

/// The address of a StarkNet contract.
pub type ContractAddress = Felt;

/// The global state commitment after a block.
pub type StateCommitment = Felt;
