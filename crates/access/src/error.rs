use crate::identifier::IdKind;

/// Crate-wide result type for allow-list operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed allow-list errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Identifier does not carry the prefix required for its kind.
    #[error("invalid {kind} ID format: {id}. Must start with '{}'", kind.prefix())]
    InvalidFormat { kind: IdKind, id: String },

    /// Identifier is not present in the allow-list.
    #[error("{kind} {id} not found")]
    NotFound { kind: IdKind, id: String },

    /// Reading or writing the persisted record failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The persisted record could not be encoded.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// A background filesystem task was cancelled or panicked.
    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    /// True for the mutation failures an API caller can correct (as opposed
    /// to storage faults).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. } | Self::NotFound { .. })
    }
}
