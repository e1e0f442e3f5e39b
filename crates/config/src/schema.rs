use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChanlogConfig {
    pub server: ServerConfig,
    pub slack: SlackConfig,
    pub access: AccessConfig,
    pub exports: ExportsConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Public base URL used to build download links. Defaults to the local
    /// listener; set this when the gateway sits behind a proxy.
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5000,
            public_url: None,
        }
    }
}

impl ServerConfig {
    /// The base URL download links are built from.
    #[must_use]
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

/// Slack credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Bot token used for Web API calls (`SLACK_BOT_TOKEN`).
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub bot_token: Option<Secret<String>>,
}

/// Allow-list store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Directory holding the persisted allow-list records.
    pub data_dir: Option<PathBuf>,
    /// Identifiers inserted once at startup when the corresponding record is
    /// empty. Explicit seeding replaces any implicit default entries.
    pub seed_users: Vec<String>,
    pub seed_channels: Vec<String>,
}

/// Export artifact settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportsConfig {
    /// Directory export artifacts are written to.
    pub dir: Option<PathBuf>,
}

impl ChanlogConfig {
    /// Resolved allow-list directory.
    #[must_use]
    pub fn access_dir(&self) -> PathBuf {
        self.access
            .data_dir
            .clone()
            .unwrap_or_else(|| default_data_dir().join("access"))
    }

    /// Resolved exports directory.
    #[must_use]
    pub fn exports_dir(&self) -> PathBuf {
        self.exports
            .dir
            .clone()
            .unwrap_or_else(|| default_data_dir().join("exports"))
    }
}

/// User-global data directory (`~/.local/share/chanlog` on Linux), falling
/// back to the working directory.
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "chanlog")
        .map_or_else(|| PathBuf::from("."), |d| d.data_dir().to_path_buf())
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
