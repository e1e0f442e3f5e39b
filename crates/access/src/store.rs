use std::{
    collections::BTreeSet,
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use {
    fd_lock::RwLock,
    serde::{Deserialize, Serialize},
    tokio::sync::Mutex,
    tracing::{debug, warn},
};

use crate::{
    error::{Error, Result},
    identifier::{self, IdKind},
};

/// Persisted record layout: one JSON object per kind.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Record {
    #[serde(default)]
    items: Vec<String>,
}

/// File-backed allow-list store.
///
/// Each kind is persisted as a single JSON record (`allowed_users.json`,
/// `allowed_channels.json`) and every mutation is a full read-modify-write of
/// that record.
///
/// Concurrency contract: within one process a per-kind mutex serializes
/// mutations; on disk the record is written to a temp file in the same
/// directory and renamed into place, and an advisory lock on a sidecar
/// `.lock` file serializes writers across processes (the management CLI may
/// run against a live server).
pub struct AllowListStore {
    dir: PathBuf,
    users_lock: Mutex<()>,
    channels_lock: Mutex<()>,
}

impl AllowListStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            users_lock: Mutex::new(()),
            channels_lock: Mutex::new(()),
        })
    }

    /// Add `id` to the allow-list for `kind`.
    ///
    /// Rejects identifiers that do not carry the kind's prefix. Adding an
    /// already-present identifier is a no-op that still succeeds.
    pub async fn add(&self, kind: IdKind, id: &str) -> Result<()> {
        identifier::validate(kind, id)?;
        let id = id.to_owned();
        self.mutate(kind, move |items| {
            items.insert(id);
            Ok(())
        })
        .await
    }

    /// Remove `id` from the allow-list for `kind`.
    ///
    /// An absent identifier is a reported [`Error::NotFound`], and the
    /// persisted set is left unchanged.
    pub async fn remove(&self, kind: IdKind, id: &str) -> Result<()> {
        let id = id.to_owned();
        self.mutate(kind, move |items| {
            if items.remove(&id) {
                Ok(())
            } else {
                Err(Error::NotFound { kind, id })
            }
        })
        .await
    }

    /// Membership test.
    ///
    /// An empty allow-list contains nobody; there is no "allow all when
    /// unset" fallback.
    pub async fn contains(&self, kind: IdKind, id: &str) -> Result<bool> {
        let id = id.to_owned();
        Ok(self.snapshot(kind).await?.contains(&id))
    }

    /// All identifiers for `kind`, lexicographically ascending.
    pub async fn list(&self, kind: IdKind) -> Result<Vec<String>> {
        Ok(self.snapshot(kind).await?.into_iter().collect())
    }

    /// Empty the allow-list for `kind`. Operator tooling only; the request
    /// path never calls this.
    pub async fn clear(&self, kind: IdKind) -> Result<()> {
        self.mutate(kind, |items| {
            items.clear();
            Ok(())
        })
        .await
    }

    /// Populate the allow-list for `kind` with `ids`, but only when the
    /// persisted set is currently empty. Returns the number of identifiers
    /// inserted.
    ///
    /// Called once at process start with the configured seed set; a
    /// non-empty record is left exactly as the operator last saved it.
    pub async fn seed_if_empty(&self, kind: IdKind, ids: &[String]) -> Result<usize> {
        for id in ids {
            identifier::validate(kind, id)?;
        }
        let ids = ids.to_vec();
        self.mutate(kind, move |items| {
            if !items.is_empty() {
                return Ok(0);
            }
            items.extend(ids);
            let inserted = items.len();
            if inserted > 0 {
                debug!(%kind, inserted, "seeded allow-list");
            }
            Ok(inserted)
        })
        .await
    }

    fn record_path(&self, kind: IdKind) -> PathBuf {
        self.dir.join(kind.record_name())
    }

    fn kind_lock(&self, kind: IdKind) -> &Mutex<()> {
        match kind {
            IdKind::User => &self.users_lock,
            IdKind::Channel => &self.channels_lock,
        }
    }

    /// Read-modify-write cycle under the kind's mutex and the on-disk
    /// advisory lock.
    async fn mutate<T, F>(&self, kind: IdKind, apply: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut BTreeSet<String>) -> Result<T> + Send + 'static,
    {
        let _guard = self.kind_lock(kind).lock().await;
        let path = self.record_path(kind);
        tokio::task::spawn_blocking(move || -> Result<T> {
            let lock_file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(lock_path(&path))?;
            let mut lock = RwLock::new(lock_file);
            let _flock = lock.write()?;

            let mut items = load_record(&path);
            let out = apply(&mut items)?;
            write_record(&path, &items)?;
            Ok(out)
        })
        .await?
    }

    async fn snapshot(&self, kind: IdKind) -> Result<BTreeSet<String>> {
        let path = self.record_path(kind);
        tokio::task::spawn_blocking(move || Ok(load_record(&path))).await?
    }
}

fn lock_path(record: &Path) -> PathBuf {
    let mut name = record.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Load the record at `path`. A missing file is an empty set; a corrupt
/// record is logged and treated as empty rather than wedging the gateway.
fn load_record(path: &Path) -> BTreeSet<String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeSet::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read allow-list record");
            return BTreeSet::new();
        },
    };
    match serde_json::from_str::<Record>(&raw) {
        Ok(record) => record.items.into_iter().collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt allow-list record, treating as empty");
            BTreeSet::new()
        },
    }
}

/// Write the record atomically: temp file in the same directory, then rename.
fn write_record(path: &Path, items: &BTreeSet<String>) -> Result<()> {
    let record = Record {
        items: items.iter().cloned().collect(),
    };
    let bytes = serde_json::to_vec_pretty(&record)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn open(dir: &Path) -> AllowListStore {
        AllowListStore::open(dir).unwrap()
    }

    #[tokio::test]
    async fn add_rejects_wrong_prefix() {
        let tmp = tempdir().unwrap();
        let store = open(tmp.path());

        let err = store.add(IdKind::User, "C123").await.unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
        let err = store.add(IdKind::Channel, "U123").await.unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));

        // Nothing was persisted.
        assert!(store.list(IdKind::User).await.unwrap().is_empty());
        assert!(store.list(IdKind::Channel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let tmp = tempdir().unwrap();
        let store = open(tmp.path());

        store.add(IdKind::User, "U111").await.unwrap();
        store.add(IdKind::User, "U111").await.unwrap();

        assert_eq!(store.list(IdKind::User).await.unwrap(), vec!["U111"]);
    }

    #[tokio::test]
    async fn remove_absent_fails_and_leaves_set_unchanged() {
        let tmp = tempdir().unwrap();
        let store = open(tmp.path());
        store.add(IdKind::User, "U111").await.unwrap();

        let err = store.remove(IdKind::User, "U999").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(store.list(IdKind::User).await.unwrap(), vec!["U111"]);
    }

    #[tokio::test]
    async fn list_is_sorted_and_duplicate_free() {
        let tmp = tempdir().unwrap();
        let store = open(tmp.path());
        for id in ["U30", "U10", "U20", "U10"] {
            store.add(IdKind::User, id).await.unwrap();
        }
        assert_eq!(
            store.list(IdKind::User).await.unwrap(),
            vec!["U10", "U20", "U30"]
        );
    }

    #[tokio::test]
    async fn lists_are_independent() {
        let tmp = tempdir().unwrap();
        let store = open(tmp.path());
        store.add(IdKind::User, "U1").await.unwrap();
        store.add(IdKind::Channel, "C1").await.unwrap();

        assert!(store.contains(IdKind::User, "U1").await.unwrap());
        assert!(!store.contains(IdKind::Channel, "U1").await.unwrap());
        store.clear(IdKind::User).await.unwrap();
        assert!(store.contains(IdKind::Channel, "C1").await.unwrap());
    }

    #[tokio::test]
    async fn clear_empties_the_set() {
        let tmp = tempdir().unwrap();
        let store = open(tmp.path());
        store.add(IdKind::Channel, "C1").await.unwrap();
        store.clear(IdKind::Channel).await.unwrap();
        assert!(store.list(IdKind::Channel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_applies_only_to_an_empty_record() {
        let tmp = tempdir().unwrap();
        let store = open(tmp.path());

        let seeded = store
            .seed_if_empty(IdKind::User, &["U1".into(), "U2".into()])
            .await
            .unwrap();
        assert_eq!(seeded, 2);

        // A populated record is never overwritten by seeds.
        let seeded = store
            .seed_if_empty(IdKind::User, &["U9".into()])
            .await
            .unwrap();
        assert_eq!(seeded, 0);
        assert_eq!(store.list(IdKind::User).await.unwrap(), vec!["U1", "U2"]);
    }

    #[tokio::test]
    async fn seed_validates_before_writing() {
        let tmp = tempdir().unwrap();
        let store = open(tmp.path());
        let err = store
            .seed_if_empty(IdKind::User, &["U1".into(), "bad".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
        assert!(store.list(IdKind::User).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn survives_reopen() {
        let tmp = tempdir().unwrap();
        {
            let store = open(tmp.path());
            store.add(IdKind::User, "U42").await.unwrap();
        }
        let store = open(tmp.path());
        assert!(store.contains(IdKind::User, "U42").await.unwrap());
    }

    #[tokio::test]
    async fn corrupt_record_is_treated_as_empty() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("allowed_users.json"), "{not json").unwrap();
        let store = open(tmp.path());
        assert!(store.list(IdKind::User).await.unwrap().is_empty());
        // And recovers on the next write.
        store.add(IdKind::User, "U1").await.unwrap();
        assert_eq!(store.list(IdKind::User).await.unwrap(), vec!["U1"]);
    }

    #[tokio::test]
    async fn concurrent_adds_all_land() {
        let tmp = tempdir().unwrap();
        let store = std::sync::Arc::new(open(tmp.path()));

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = std::sync::Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.add(IdKind::User, &format!("U{i:02}")).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(store.list(IdKind::User).await.unwrap().len(), 16);
    }
}
