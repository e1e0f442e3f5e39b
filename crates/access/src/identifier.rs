use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The two kinds of identifier the gateway allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    User,
    Channel,
}

impl IdKind {
    /// Leading character a well-formed identifier of this kind must carry.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::User => 'U',
            Self::Channel => 'C',
        }
    }

    /// File name of the persisted record for this kind.
    pub(crate) const fn record_name(self) -> &'static str {
        match self {
            Self::User => "allowed_users.json",
            Self::Channel => "allowed_channels.json",
        }
    }
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Channel => write!(f, "channel"),
        }
    }
}

/// Validate that `id` is well-formed for `kind`.
///
/// Invalid identifiers are rejected at the mutation boundary and never reach
/// the persisted record.
pub fn validate(kind: IdKind, id: &str) -> Result<()> {
    if id.starts_with(kind.prefix()) {
        Ok(())
    } else {
        Err(Error::InvalidFormat {
            kind,
            id: id.to_owned(),
        })
    }
}
