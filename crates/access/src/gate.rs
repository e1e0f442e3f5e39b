use std::sync::Arc;

use crate::{error::Result, identifier::IdKind, store::AllowListStore};

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(DenyReason),
}

/// Which allow-list check failed.
///
/// The `Display` text is embedded verbatim in the denial notice sent back
/// through the callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    UserNotAllowed(String),
    ChannelNotAllowed(String),
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotAllowed(id) => {
                write!(f, "User {id} is not authorized to use this exporter")
            },
            Self::ChannelNotAllowed(id) => {
                write!(f, "Channel {id} is not authorized for export")
            },
        }
    }
}

/// Pure authorization check over the allow-list store: allowed iff the
/// requesting user and the target channel are both allow-listed.
///
/// The user check runs first, so a request failing both reports the user.
/// An empty allow-list denies everyone.
#[derive(Clone)]
pub struct AccessGate {
    store: Arc<AllowListStore>,
}

impl AccessGate {
    #[must_use]
    pub fn new(store: Arc<AllowListStore>) -> Self {
        Self { store }
    }

    pub async fn authorize(&self, user_id: &str, channel_id: &str) -> Result<Access> {
        if !self.store.contains(IdKind::User, user_id).await? {
            return Ok(Access::Denied(DenyReason::UserNotAllowed(
                user_id.to_owned(),
            )));
        }
        if !self.store.contains(IdKind::Channel, channel_id).await? {
            return Ok(Access::Denied(DenyReason::ChannelNotAllowed(
                channel_id.to_owned(),
            )));
        }
        Ok(Access::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn gate(dir: &std::path::Path) -> (AccessGate, Arc<AllowListStore>) {
        let store = Arc::new(AllowListStore::open(dir).unwrap());
        (AccessGate::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn empty_lists_deny_everyone() {
        let tmp = tempdir().unwrap();
        let (gate, _store) = gate(tmp.path());
        assert_eq!(
            gate.authorize("U1", "C1").await.unwrap(),
            Access::Denied(DenyReason::UserNotAllowed("U1".into()))
        );
    }

    #[tokio::test]
    async fn user_allowed_but_channel_list_empty_denies() {
        let tmp = tempdir().unwrap();
        let (gate, store) = gate(tmp.path());
        store.add(IdKind::User, "U1").await.unwrap();

        assert_eq!(
            gate.authorize("U1", "C1").await.unwrap(),
            Access::Denied(DenyReason::ChannelNotAllowed("C1".into()))
        );
    }

    #[tokio::test]
    async fn channel_allowed_but_user_list_empty_denies() {
        let tmp = tempdir().unwrap();
        let (gate, store) = gate(tmp.path());
        store.add(IdKind::Channel, "C1").await.unwrap();

        assert_eq!(
            gate.authorize("U1", "C1").await.unwrap(),
            Access::Denied(DenyReason::UserNotAllowed("U1".into()))
        );
    }

    #[tokio::test]
    async fn both_listed_allows() {
        let tmp = tempdir().unwrap();
        let (gate, store) = gate(tmp.path());
        store.add(IdKind::User, "U1").await.unwrap();
        store.add(IdKind::Channel, "C1").await.unwrap();

        assert_eq!(gate.authorize("U1", "C1").await.unwrap(), Access::Allowed);
        // Another user against the same channel is still denied.
        assert!(matches!(
            gate.authorize("U2", "C1").await.unwrap(),
            Access::Denied(DenyReason::UserNotAllowed(_))
        ));
    }

    /// Security regression: removing the last entry from an allow-list must
    /// NOT silently switch to open access. Failure here means anyone can
    /// export once an admin empties a list.
    #[tokio::test]
    async fn removing_last_entry_denies_access() {
        let tmp = tempdir().unwrap();
        let (gate, store) = gate(tmp.path());
        store.add(IdKind::User, "U1").await.unwrap();
        store.add(IdKind::Channel, "C1").await.unwrap();
        assert_eq!(gate.authorize("U1", "C1").await.unwrap(), Access::Allowed);

        store.remove(IdKind::User, "U1").await.unwrap();
        assert_eq!(
            gate.authorize("U1", "C1").await.unwrap(),
            Access::Denied(DenyReason::UserNotAllowed("U1".into())),
            "empty user allow-list must deny the previously-allowed user"
        );

        store.add(IdKind::User, "U1").await.unwrap();
        store.clear(IdKind::Channel).await.unwrap();
        assert_eq!(
            gate.authorize("U1", "C1").await.unwrap(),
            Access::Denied(DenyReason::ChannelNotAllowed("C1".into())),
            "cleared channel allow-list must deny the previously-allowed channel"
        );
    }
}
