use {async_trait::async_trait, tracing::debug};

use chanlog_export::Notifier;

use crate::error::Result;

/// Posts progress/result notices as `{"text": …}` JSON to the
/// caller-supplied `response_url`.
///
/// This is the asynchronous half of the slash-command contract: the webhook
/// answers 200 immediately and everything the requester actually reads
/// arrives through here.
#[derive(Default, Clone)]
pub struct ResponseUrlNotifier {
    http: reqwest::Client,
}

impl ResponseUrlNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn post(&self, response_url: &str, text: &str) -> Result<()> {
        self.http
            .post(response_url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?
            .error_for_status()?;
        debug!(chars = text.len(), "posted notice to response_url");
        Ok(())
    }
}

#[async_trait]
impl Notifier for ResponseUrlNotifier {
    async fn notify(&self, response_url: &str, text: &str) -> anyhow::Result<()> {
        Ok(self.post(response_url, text).await?)
    }
}
