use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    serde_json::Value,
    tracing::debug,
};

use chanlog_export::ConversationSource;

use crate::error::{Error, Result};

const API_BASE: &str = "https://slack.com/api";
const PAGE_LIMIT: &str = "200";

/// Slack Web API client.
///
/// Pagination is followed to exhaustion. There is no rate-limit backoff or
/// retry; a failed call surfaces as a terminal pipeline failure.
pub struct SlackClient {
    http: reqwest::Client,
    token: Secret<String>,
    base_url: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: Secret<String>) -> Self {
        Self::with_base_url(token, API_BASE)
    }

    /// Point the client at a different API base (tests).
    #[must_use]
    pub fn with_base_url(token: Secret<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base_url: base_url.into(),
        }
    }

    /// Full channel history, oldest message first.
    pub async fn conversations_history(&self, channel_id: &str) -> Result<Vec<Value>> {
        let mut messages = self
            .paginate("conversations.history", &[("channel", channel_id)], |e| {
                std::mem::take(&mut e.messages)
            })
            .await?;
        // The API yields newest-first pages; exports are chronological.
        messages.reverse();
        Ok(messages)
    }

    /// All replies in the threads rooted at `thread_ts`, flattened in root
    /// order.
    pub async fn conversations_replies(
        &self,
        channel_id: &str,
        thread_ts: &[String],
    ) -> Result<Vec<Value>> {
        let mut all = Vec::new();
        for ts in thread_ts {
            let thread = self
                .paginate(
                    "conversations.replies",
                    &[("channel", channel_id), ("ts", ts)],
                    |e| std::mem::take(&mut e.messages),
                )
                .await?;
            all.extend(thread);
        }
        Ok(all)
    }

    /// The workspace user directory.
    pub async fn users_list(&self) -> Result<Vec<Value>> {
        self.paginate("users.list", &[], |e| std::mem::take(&mut e.members))
            .await
    }

    /// Follow `next_cursor` pagination for `method`, extracting the page
    /// payload with `take_page`.
    async fn paginate<F>(
        &self,
        method: &str,
        params: &[(&str, &str)],
        mut take_page: F,
    ) -> Result<Vec<Value>>
    where
        F: FnMut(&mut Envelope) -> Vec<Value>,
    {
        let mut out = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut query: Vec<(&str, &str)> = params.to_vec();
            query.push(("limit", PAGE_LIMIT));
            if let Some(ref c) = cursor {
                query.push(("cursor", c.as_str()));
            }
            let mut envelope = self.call(method, &query).await?;
            out.extend(take_page(&mut envelope));

            cursor = envelope
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }
        debug!(method, records = out.len(), "slack fetch complete");
        Ok(out)
    }

    async fn call(&self, method: &str, query: &[(&str, &str)]) -> Result<Envelope> {
        let url = format!("{}/{method}", self.base_url);
        let envelope: Envelope = self
            .http
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if !envelope.ok {
            return Err(Error::Api {
                method: method.to_owned(),
                error: envelope
                    .error
                    .unwrap_or_else(|| "unknown_error".to_owned()),
            });
        }
        Ok(envelope)
    }
}

/// Common Slack response envelope; unused sections default to empty.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    messages: Vec<Value>,
    #[serde(default)]
    members: Vec<Value>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    next_cursor: Option<String>,
}

#[async_trait]
impl ConversationSource for SlackClient {
    async fn history(&self, channel_id: &str) -> anyhow::Result<Vec<Value>> {
        Ok(self.conversations_history(channel_id).await?)
    }

    async fn replies(&self, channel_id: &str, thread_ts: &[String]) -> anyhow::Result<Vec<Value>> {
        Ok(self.conversations_replies(channel_id, thread_ts).await?)
    }

    async fn users(&self, _team_id: &str) -> anyhow::Result<Vec<Value>> {
        // users.list is scoped by the bearer token, not the team id.
        Ok(self.users_list().await?)
    }
}
