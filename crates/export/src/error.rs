/// Crate-wide result type for pipeline steps.
pub type Result<T> = std::result::Result<T, Error>;

/// Terminal pipeline failures.
///
/// None of these reach the webhook's synchronous response; the pipeline
/// forwards their message to the callback URL instead. Collaborator failures
/// are never retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The allow-list store could not be consulted.
    #[error(transparent)]
    Access(#[from] chanlog_access::Error),

    /// The artifact could not be persisted.
    #[error(transparent)]
    Artifact(#[from] chanlog_archive::Error),

    /// An external messaging API call failed.
    #[error("external API call failed: {0}")]
    Collaborator(#[source] anyhow::Error),

    /// A notice could not be delivered to the callback URL.
    #[error("callback delivery failed: {0}")]
    Notify(#[source] anyhow::Error),
}
