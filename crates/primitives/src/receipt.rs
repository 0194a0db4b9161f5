use crate::{ContractAddress, Felt, TxHash};
use serde::{Deserialize, Serialize};

/// The receipt of an executed transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// The hash of the executed transaction.
    pub transaction_hash: TxHash,
    /// The fee actually charged for the transaction.
    pub actual_fee: Felt,
    /// The events emitted during execution, in emission order.
    pub events: Vec<Event>,
}

/// An event emitted by a contract during transaction execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The address of the emitting contract.
    pub from_address: ContractAddress,
    /// The event keys.
    pub keys: Vec<Felt>,
    /// The event data.
    pub data: Vec<Felt>,
}
