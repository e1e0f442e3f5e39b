//! Text-mode transcript rendering.

use std::collections::HashMap;

use serde_json::Value;

const SEPARATOR: &str = "========================";

/// Header for a channel-history export.
#[must_use]
pub fn history_header(channel_name: &str, channel_id: &str, message_count: usize) -> String {
    format!("Channel Name: {channel_name}\nChannel ID: {channel_id}\n{message_count} Messages\n{SEPARATOR}\n\n")
}

/// Header for a thread-replies export.
#[must_use]
pub fn replies_header(channel_name: &str, message_count: usize) -> String {
    format!("Threads in: {channel_name}\n{message_count} Messages\n{SEPARATOR}\n\n")
}

/// Build an id → display-name map from a `users.list` payload.
///
/// Prefers the profile display name, then the profile real name, then the
/// account handle. Ids with no usable name fall through to the raw id at
/// render time.
#[must_use]
pub fn user_names(users: &[Value]) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for user in users {
        let Some(id) = user.get("id").and_then(Value::as_str) else {
            continue;
        };
        let profile = user.get("profile");
        let name = profile
            .and_then(|p| p.get("display_name"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                profile
                    .and_then(|p| p.get("real_name"))
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            })
            .or_else(|| user.get("name").and_then(Value::as_str));
        if let Some(name) = name {
            names.insert(id.to_owned(), name.to_owned());
        }
    }
    names
}

/// Render messages one per line: `[timestamp] sender: text`.
#[must_use]
pub fn transcript(messages: &[Value], names: &HashMap<String, String>) -> String {
    let mut out = String::new();
    for message in messages {
        let ts = message.get("ts").and_then(Value::as_str).unwrap_or("");
        let sender = message
            .get("user")
            .or_else(|| message.get("username"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let who = names.get(sender).map_or(sender, String::as_str);
        let text = message.get("text").and_then(Value::as_str).unwrap_or("");
        out.push_str(&format!("[{}] {who}: {text}\n", format_ts(ts)));
    }
    out
}

/// Render a Slack epoch timestamp (`"1700000000.123456"`) as UTC wall time.
/// Unparseable timestamps pass through verbatim.
fn format_ts(ts: &str) -> String {
    ts.split('.')
        .next()
        .and_then(|secs| secs.parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || ts.to_owned(),
            |when| when.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
}
