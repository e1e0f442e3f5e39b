//! Slack Web API collaborators for the export pipeline.
//!
//! Implements the pipeline's `ConversationSource` seam over the REST API
//! (`conversations.history`, `conversations.replies`, `users.list`, all with
//! cursor pagination) and its `Notifier` seam over the slash-command
//! `response_url` callback.

pub mod client;
pub mod error;
pub mod notify;

pub use {
    client::SlackClient,
    error::{Error, Result},
    notify::ResponseUrlNotifier,
};
