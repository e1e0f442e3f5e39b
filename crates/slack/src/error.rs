/// Crate-wide result type for Slack API calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed Slack client errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connect, TLS, non-2xx status, body decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Slack answered 200 with an `ok: false` envelope.
    #[error("slack {method} failed: {error}")]
    Api { method: String, error: String },
}
