//! Export pipeline: one slash-command request in, one single-use download
//! link out.
//!
//! The pipeline authorizes the requester against the allow-lists, fetches
//! history (and thread replies) from the messaging API through the
//! [`service::ConversationSource`] seam, renders a text transcript or raw
//! JSON, persists the artifact, and reports progress and the final link to
//! the caller-supplied callback URL. Webhook parsing and HTTP live in the
//! gateway crate.

pub mod error;
pub mod pipeline;
pub mod render;
pub mod request;
pub mod service;

pub use {
    error::{Error, Result},
    pipeline::ExportPipeline,
    request::{ExportKind, ExportMode, ExportRequest, MalformedRequest},
    service::{ConversationSource, Notifier},
};
