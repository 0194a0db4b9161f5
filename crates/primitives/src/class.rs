use crate::ClassHash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A contract class definition.
///
/// The definition is treated as a content addressed opaque blob: it is keyed
/// by its class hash and never interpreted by this node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// The raw class definition.
    pub definition: Vec<u8>,
}

/// All classes referenced by a state update, resolved by class hash.
pub type ClassMap = HashMap<ClassHash, Class>;
