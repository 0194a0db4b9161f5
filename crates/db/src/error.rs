/// Database error type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    /// The requested key is not present in the store.
    ///
    /// Queries propagate this verbatim; it is the only way a read
    /// distinguishes "absent" from "failed".
    #[error("key not found")]
    NotFound,
    /// Failed to encode a value for a table.
    #[error("failed to encode a value for table {0}")]
    Encode(&'static str),
    /// Failed to decode a value read from a table.
    #[error("failed to decode a value from table {0}")]
    Decode(&'static str),
    /// Backend specific failure.
    #[error("database backend error: {0}")]
    Backend(String),
}
