use std::collections::HashMap;

use chanlog_archive::ExportFormat;

/// Rendering mode chosen by the slash-command argument.
///
/// `text` selects the transcript rendering; any other argument (including
/// none at all) falls back to raw JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    Text,
    Json,
}

impl ExportMode {
    #[must_use]
    pub fn parse(command_args: &str) -> Self {
        if command_args.to_lowercase() == "text" {
            Self::Text
        } else {
            Self::Json
        }
    }

    #[must_use]
    pub const fn format(self) -> ExportFormat {
        match self {
            Self::Text => ExportFormat::Text,
            Self::Json => ExportFormat::Json,
        }
    }
}

/// Which slash command drove the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    History,
    Replies,
}

impl ExportKind {
    /// Tag embedded in the artifact token.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::History => "ch",
            Self::Replies => "re",
        }
    }

    /// Liveness notice posted before the (potentially slow) fetch begins.
    #[must_use]
    pub const fn progress_notice(self) -> &'static str {
        match self {
            Self::History => "Retrieving history for this channel...",
            Self::Replies => "Retrieving reply threads for this channel...",
        }
    }

    /// Completion notice carrying the one-time download link.
    #[must_use]
    pub fn completion_notice(self, link: &str) -> String {
        let what = match self {
            Self::History => "history",
            Self::Replies => "reply threads",
        };
        format!(
            "Done! This channel's {what} is available for download here \
             (note that this link is single-use): {link}"
        )
    }
}

/// A required webhook field was missing. Reported synchronously to the chat
/// platform as diagnostic text (still HTTP 200).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Sorry! I got an unexpected response (missing field: {field}).")]
pub struct MalformedRequest {
    pub field: &'static str,
}

/// Immutable per-request value parsed from a slash-command payload.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub response_url: String,
    pub mode: ExportMode,
}

impl ExportRequest {
    /// Extract the required fields from a decoded form payload.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, MalformedRequest> {
        let field = |name: &'static str| -> Result<String, MalformedRequest> {
            form.get(name)
                .cloned()
                .ok_or(MalformedRequest { field: name })
        };
        Ok(Self {
            team_id: field("team_id")?,
            team_domain: field("team_domain")?,
            channel_id: field("channel_id")?,
            channel_name: field("channel_name")?,
            user_id: field("user_id")?,
            response_url: field("response_url")?,
            mode: ExportMode::parse(&field("text")?),
        })
    }
}
