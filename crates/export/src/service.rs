use {anyhow::Result, async_trait::async_trait, serde_json::Value};

/// External messaging API surface the pipeline fetches from.
///
/// Messages and users are opaque records; the pipeline only counts messages,
/// reads `ts`, and detects the `reply_count` marker. Everything else passes
/// through untouched for JSON exports or is handed to the renderer.
#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// Full message history of a channel, in chronological order.
    async fn history(&self, channel_id: &str) -> Result<Vec<Value>>;

    /// Thread replies for the given root timestamps, flattened into one
    /// sequence.
    async fn replies(&self, channel_id: &str, thread_ts: &[String]) -> Result<Vec<Value>>;

    /// Workspace user directory, used to resolve ids to display names.
    async fn users(&self, team_id: &str) -> Result<Vec<Value>>;
}

/// Delivery of asynchronous progress/result notices to the caller-supplied
/// callback URL.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, response_url: &str, text: &str) -> Result<()>;
}
