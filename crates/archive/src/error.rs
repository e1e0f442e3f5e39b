/// Crate-wide result type for artifact operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed artifact errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Token contains a path separator or parent-directory segment. Raised
    /// before any filesystem access.
    #[error("invalid download token: {token}")]
    InvalidToken { token: String },

    /// No artifact exists for the token (never created, or already consumed).
    #[error("no artifact for token: {token}")]
    NotFound { token: String },

    /// Reading or writing the backing file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON body could not be serialized.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}
