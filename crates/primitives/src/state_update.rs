use crate::{BlockHash, ClassHash, ContractAddress, Felt, StateCommitment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The state change caused by a block, as served by the feeder gateway.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// The hash of the block this update belongs to.
    pub block_hash: BlockHash,
    /// The global state commitment after applying this update.
    pub new_root: StateCommitment,
    /// The global state commitment before applying this update.
    pub old_root: StateCommitment,
    /// The individual state changes.
    pub state_diff: StateDiff,
}

/// The individual state changes caused by a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiff {
    /// Storage writes, grouped by contract address.
    pub storage_diffs: HashMap<ContractAddress, Vec<StorageEntry>>,
    /// Contracts deployed in this block.
    pub deployed_contracts: Vec<DeployedContract>,
    /// Hashes of classes declared in this block.
    pub declared_classes: Vec<ClassHash>,
    /// Updated account nonces, by contract address.
    pub nonces: HashMap<ContractAddress, Felt>,
    /// Contracts whose class was replaced in this block.
    pub replaced_classes: Vec<DeployedContract>,
}

impl StateDiff {
    /// Returns the union of all class hashes referenced by this diff.
    ///
    /// Deployed and replaced contracts may reference classes that were
    /// declared in earlier blocks, so the deployment references have to be
    /// resolved in addition to the declared set.
    pub fn class_hashes(&self) -> Vec<ClassHash> {
        let mut hashes: Vec<ClassHash> = self
            .deployed_contracts
            .iter()
            .chain(&self.replaced_classes)
            .map(|contract| contract.class_hash)
            .chain(self.declared_classes.iter().copied())
            .collect();
        hashes.sort();
        hashes.dedup();
        hashes
    }
}

/// A contract instance bound to a class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    /// The address of the contract.
    pub address: ContractAddress,
    /// The hash of the contract's class.
    pub class_hash: ClassHash,
}

/// A single storage write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    /// The storage address written to.
    pub key: Felt,
    /// The value written.
    pub value: Felt,
}
