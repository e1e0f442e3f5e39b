use std::path::PathBuf;

use {rand::RngCore, serde::Serialize as _, tracing::debug};

use crate::{
    download::Download,
    error::{Error, Result},
};

/// Rendered representation an artifact is written from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// Content to persist: a fully-formed text document, or a JSON value written
/// with 4-space indentation, original field order preserved, and non-ASCII
/// characters kept literal.
#[derive(Debug, Clone)]
pub enum ExportBody {
    Text(String),
    Json(serde_json::Value),
}

/// A named export file awaiting download. The file name is the public token.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub(crate) path: PathBuf,
}

impl Artifact {
    /// The public download token for this artifact.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.file_name
    }
}

/// Manages the export-file namespace under a single directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Generate a unique artifact name of the form
    /// `{teamDomain}-{kindTag}_{channelId}-{random6hex}.{ext}`.
    ///
    /// The random component only disambiguates concurrent exports of the
    /// same channel; it is not a security token.
    #[must_use]
    pub fn allocate(
        &self,
        team_domain: &str,
        channel_id: &str,
        kind_tag: &str,
        format: &ExportFormat,
    ) -> Artifact {
        let mut nonce = [0u8; 3];
        rand::rng().fill_bytes(&mut nonce);
        let file_name = format!(
            "{team_domain}-{kind_tag}_{channel_id}-{:02x}{:02x}{:02x}.{}",
            nonce[0],
            nonce[1],
            nonce[2],
            format.extension(),
        );
        let path = self.dir.join(&file_name);
        Artifact { file_name, path }
    }

    /// Write the rendered body to the artifact's backing file, creating the
    /// exports directory on first use.
    pub async fn write(&self, artifact: &Artifact, body: &ExportBody) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let bytes = match body {
            ExportBody::Text(text) => text.clone().into_bytes(),
            ExportBody::Json(value) => render_json(value)?,
        };
        tokio::fs::write(&artifact.path, bytes).await?;
        debug!(file = %artifact.file_name, "wrote export artifact");
        Ok(())
    }

    /// Open the artifact behind `token` for its one and only download.
    ///
    /// The token is validated before any filesystem access; the returned
    /// stream deletes the backing file once it has been fully served (or
    /// dropped mid-read), so a second retrieve with the same token reports
    /// [`Error::NotFound`].
    pub async fn retrieve(&self, token: &str) -> Result<Download> {
        if !token_is_safe(token) {
            return Err(Error::InvalidToken {
                token: token.to_owned(),
            });
        }
        let path = self.dir.join(token);
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    token: token.to_owned(),
                });
            },
            Err(e) => return Err(e.into()),
        };
        Ok(Download::new(token.to_owned(), path, file))
    }
}

/// A token must stay inside the exports directory: no separators, no
/// parent-directory segments, no empty names.
fn token_is_safe(token: &str) -> bool {
    !token.is_empty() && !token.contains('/') && !token.contains('\\') && !token.contains("..")
}

/// Serialize with 4-space indentation. `serde_json` keeps non-ASCII literal
/// and (with `preserve_order`) emits object fields in their original order.
fn render_json(value: &serde_json::Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
    value.serialize(&mut ser)?;
    Ok(out)
}
