use crate::{ClassHash, ContractAddress, Felt, TxHash};
use serde::{Deserialize, Serialize};

/// A StarkNet transaction.
///
/// Transaction hashes are carried from the upstream source. Only the
/// [`Invoke`](Self::Invoke) variant contributes its signature to the
/// transaction commitment, matching the feeder gateway's header convention.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transaction {
    /// An invocation of a function of a deployed contract.
    Invoke(InvokeTransaction),
    /// A declaration of a new contract class.
    Declare(DeclareTransaction),
    /// A (deprecated) deployment of a contract instance.
    Deploy(DeployTransaction),
    /// A deployment of an account contract.
    DeployAccount(DeployAccountTransaction),
    /// A message sent from L1, handled by a contract on L2.
    L1Handler(L1HandlerTransaction),
}

impl Transaction {
    /// Returns the transaction hash.
    pub fn hash(&self) -> TxHash {
        match self {
            Self::Invoke(tx) => tx.hash,
            Self::Declare(tx) => tx.hash,
            Self::Deploy(tx) => tx.hash,
            Self::DeployAccount(tx) => tx.hash,
            Self::L1Handler(tx) => tx.hash,
        }
    }

    /// Returns the transaction signature, empty for unsigned variants.
    pub fn signature(&self) -> &[Felt] {
        match self {
            Self::Invoke(tx) => &tx.signature,
            Self::Declare(tx) => &tx.signature,
            Self::DeployAccount(tx) => &tx.signature,
            Self::Deploy(_) | Self::L1Handler(_) => &[],
        }
    }
}

/// An invoke transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeTransaction {
    /// The transaction hash.
    pub hash: TxHash,
    /// The address of the invoked contract.
    pub contract_address: ContractAddress,
    /// The selector of the invoked entry point.
    pub entry_point_selector: Felt,
    /// The arguments passed to the invoked entry point.
    pub calldata: Vec<Felt>,
    /// The transaction signature.
    pub signature: Vec<Felt>,
    /// The maximal fee the sender is willing to pay.
    pub max_fee: Felt,
    /// The account nonce.
    pub nonce: Felt,
}

/// A declare transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclareTransaction {
    /// The transaction hash.
    pub hash: TxHash,
    /// The hash of the declared class.
    pub class_hash: ClassHash,
    /// The address of the declaring account.
    pub sender_address: ContractAddress,
    /// The transaction signature.
    pub signature: Vec<Felt>,
    /// The maximal fee the sender is willing to pay.
    pub max_fee: Felt,
    /// The account nonce.
    pub nonce: Felt,
    /// The transaction version.
    pub version: Felt,
}

/// A (deprecated) deploy transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployTransaction {
    /// The transaction hash.
    pub hash: TxHash,
    /// The address of the deployed contract.
    pub contract_address: ContractAddress,
    /// The salt used to derive the contract address.
    pub contract_address_salt: Felt,
    /// The hash of the deployed contract's class.
    pub class_hash: ClassHash,
    /// The arguments passed to the class constructor.
    pub constructor_calldata: Vec<Felt>,
}

/// A deploy account transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployAccountTransaction {
    /// The transaction hash.
    pub hash: TxHash,
    /// The address of the deployed account contract.
    pub contract_address: ContractAddress,
    /// The salt used to derive the contract address.
    pub contract_address_salt: Felt,
    /// The hash of the account contract's class.
    pub class_hash: ClassHash,
    /// The arguments passed to the class constructor.
    pub constructor_calldata: Vec<Felt>,
    /// The transaction signature.
    pub signature: Vec<Felt>,
    /// The maximal fee the sender is willing to pay.
    pub max_fee: Felt,
    /// The account nonce.
    pub nonce: Felt,
    /// The transaction version.
    pub version: Felt,
}

/// An L1 handler transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1HandlerTransaction {
    /// The transaction hash.
    pub hash: TxHash,
    /// The address of the handling contract.
    pub contract_address: ContractAddress,
    /// The selector of the handling entry point.
    pub entry_point_selector: Felt,
    /// The message payload.
    pub calldata: Vec<Felt>,
    /// The L1 nonce of the message.
    pub nonce: Felt,
}
