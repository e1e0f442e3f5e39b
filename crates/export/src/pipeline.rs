use std::sync::Arc;

use {
    serde_json::Value,
    tracing::{error, info, warn},
};

use {
    chanlog_access::{Access, AccessGate},
    chanlog_archive::{ArtifactStore, ExportBody},
};

use crate::{
    error::{Error, Result},
    render,
    request::{ExportKind, ExportMode, ExportRequest},
    service::{ConversationSource, Notifier},
};

/// Orchestrates one export request from authorization to the completion
/// notice.
///
/// Runs after the webhook has already acknowledged the chat platform, so
/// every outcome (including denial and collaborator failure) reaches the
/// requester through the callback URL. Failures are terminal; nothing is
/// retried.
pub struct ExportPipeline {
    gate: AccessGate,
    artifacts: Arc<ArtifactStore>,
    source: Arc<dyn ConversationSource>,
    notifier: Arc<dyn Notifier>,
    public_url: String,
}

impl ExportPipeline {
    #[must_use]
    pub fn new(
        gate: AccessGate,
        artifacts: Arc<ArtifactStore>,
        source: Arc<dyn ConversationSource>,
        notifier: Arc<dyn Notifier>,
        public_url: impl Into<String>,
    ) -> Self {
        let mut public_url = public_url.into();
        while public_url.ends_with('/') {
            public_url.pop();
        }
        Self {
            gate,
            artifacts,
            source,
            notifier,
            public_url,
        }
    }

    /// Run one export end to end, reporting any terminal failure to the
    /// callback URL.
    pub async fn run(&self, request: ExportRequest, kind: ExportKind) {
        if let Err(e) = self.try_run(&request, kind).await {
            error!(channel = %request.channel_id, error = %e, "export failed");
            let text = format!("❌ Export failed: {e}");
            if let Err(notify_err) = self.notifier.notify(&request.response_url, &text).await {
                warn!(error = %notify_err, "failed to deliver failure notice");
            }
        }
    }

    async fn try_run(&self, request: &ExportRequest, kind: ExportKind) -> Result<()> {
        // Authorize. Denied requests create no artifact and see only a
        // generic denial notice.
        match self
            .gate
            .authorize(&request.user_id, &request.channel_id)
            .await?
        {
            Access::Allowed => {},
            Access::Denied(reason) => {
                info!(
                    user = %request.user_id,
                    channel = %request.channel_id,
                    %reason,
                    "export denied"
                );
                self.notify(request, &format!("❌ Access denied. {reason}."))
                    .await?;
                return Ok(());
            },
        }

        // Acknowledge before the fetch: the external API call may take
        // seconds and the requester must see liveness.
        self.notify(request, kind.progress_notice()).await?;

        let history = self
            .source
            .history(&request.channel_id)
            .await
            .map_err(Error::Collaborator)?;

        let messages = match kind {
            ExportKind::History => history,
            ExportKind::Replies => {
                let roots: Vec<String> = history
                    .iter()
                    .filter(|m| m.get("reply_count").is_some())
                    .filter_map(|m| m.get("ts").and_then(Value::as_str))
                    .map(str::to_owned)
                    .collect();
                self.source
                    .replies(&request.channel_id, &roots)
                    .await
                    .map_err(Error::Collaborator)?
            },
        };

        let body = match request.mode {
            ExportMode::Text => {
                let users = self
                    .source
                    .users(&request.team_id)
                    .await
                    .map_err(Error::Collaborator)?;
                let names = render::user_names(&users);
                let header = match kind {
                    ExportKind::History => render::history_header(
                        &request.channel_name,
                        &request.channel_id,
                        messages.len(),
                    ),
                    ExportKind::Replies => {
                        render::replies_header(&request.channel_name, messages.len())
                    },
                };
                ExportBody::Text(format!("{header}{}", render::transcript(&messages, &names)))
            },
            ExportMode::Json => ExportBody::Json(Value::Array(messages)),
        };

        let artifact = self.artifacts.allocate(
            &request.team_domain,
            &request.channel_id,
            kind.tag(),
            &request.mode.format(),
        );
        self.artifacts.write(&artifact, &body).await?;

        let link = format!("{}/download/{}", self.public_url, artifact.token());
        self.notify(request, &kind.completion_notice(&link)).await?;
        info!(
            channel = %request.channel_id,
            token = %artifact.token(),
            "export complete"
        );
        Ok(())
    }

    async fn notify(&self, request: &ExportRequest, text: &str) -> Result<()> {
        self.notifier
            .notify(&request.response_url, text)
            .await
            .map_err(Error::Notify)
    }
}
