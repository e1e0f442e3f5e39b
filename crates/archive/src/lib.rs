//! On-disk export artifacts with single-use download tokens.
//!
//! An artifact is a rendered export file whose name doubles as its public
//! download token. Serving is strictly single-use: the backing file is
//! deleted as soon as the byte stream completes, or when an aborted download
//! drops it mid-read. Artifacts that are never downloaded are never reclaimed
//! (no expiry sweep).

pub mod download;
pub mod error;
pub mod store;

pub use {
    download::Download,
    error::{Error, Result},
    store::{Artifact, ArtifactStore, ExportBody, ExportFormat},
};
