//! Disk snapshot of the message list, used to avoid an empty first paint.
//!
//! The snapshot is a hint only: a missing, unreadable or stale file reads as
//! "no cache", and write failures are logged and otherwise ignored.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mail::MessageSummary;
use crate::mail::types::Address;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Snapshot {
    messages: Vec<CachedMessage>,
    timestamp: DateTime<Utc>,
}

/// Exactly the fields `MessageSummary` writes; anything else invalidates the file
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CachedMessage {
    id: String,
    account_id: String,
    from: CachedAddress,
    to: Vec<CachedAddress>,
    subject: String,
    intro: String,
    seen: bool,
    has_attachments: bool,
    size: u64,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CachedAddress {
    address: String,
    name: String,
}

impl From<CachedAddress> for Address {
    fn from(cached: CachedAddress) -> Self {
        Address {
            address: cached.address,
            name: cached.name,
        }
    }
}

impl From<CachedMessage> for MessageSummary {
    fn from(cached: CachedMessage) -> Self {
        MessageSummary {
            id: cached.id,
            account_id: cached.account_id,
            from: cached.from.into(),
            to: cached.to.into_iter().map(Address::from).collect(),
            subject: cached.subject,
            intro: cached.intro,
            seen: cached.seen,
            has_attachments: cached.has_attachments,
            size: cached.size,
            created_at: cached.created_at,
        }
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    messages: &'a [MessageSummary],
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    /// `None` when caching is disabled
    path: Option<PathBuf>,
    expiry: Duration,
}

impl CacheStore {
    pub fn new(path: PathBuf, expiry: Duration) -> Self {
        Self {
            path: Some(path),
            expiry,
        }
    }

    /// A store that never reads or writes anything
    pub fn disabled() -> Self {
        Self {
            path: None,
            expiry: Duration::ZERO,
        }
    }

    pub fn load(&self) -> Option<Vec<MessageSummary>> {
        self.load_at(Utc::now())
    }

    /// Load the snapshot as seen at `now`
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Vec<MessageSummary>> {
        let path = self.path.as_ref()?;
        let content = fs::read(path).ok()?;

        let snapshot: Snapshot = match serde_json::from_slice(&content) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!("Ignoring unreadable cache {}: {}", path.display(), e);
                return None;
            }
        };

        let age = now.signed_duration_since(snapshot.timestamp);
        let expired = chrono::Duration::from_std(self.expiry)
            .map(|expiry| age > expiry)
            .unwrap_or(false);
        if expired {
            tracing::debug!("Cache is {}s old, ignoring", age.num_seconds());
            return None;
        }

        tracing::debug!("Loaded {} cached messages", snapshot.messages.len());
        Some(
            snapshot
                .messages
                .into_iter()
                .map(MessageSummary::from)
                .collect(),
        )
    }

    pub fn save(&self, messages: &[MessageSummary]) {
        self.save_at(messages, Utc::now());
    }

    pub fn save_at(&self, messages: &[MessageSummary], timestamp: DateTime<Utc>) {
        let Some(ref path) = self.path else {
            return;
        };

        let snapshot = SnapshotRef {
            messages,
            timestamp,
        };
        let result = serde_json::to_vec(&snapshot)
            .map_err(std::io::Error::other)
            .and_then(|bytes| {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let tmp = path.with_extension("json.tmp");
                fs::write(&tmp, bytes)?;
                fs::rename(&tmp, path)
            });

        if let Err(e) = result {
            tracing::debug!("Failed to write cache {}: {}", path.display(), e);
        }
    }

    /// Remove the snapshot file if present
    pub fn clear(&self) {
        if let Some(ref path) = self.path
            && path.exists()
            && let Err(e) = fs::remove_file(path)
        {
            tracing::debug!("Failed to remove cache {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str) -> MessageSummary {
        MessageSummary {
            id: id.to_string(),
            account_id: "acc".to_string(),
            from: Address {
                address: format!("{}@example.test", id),
                name: String::new(),
            },
            to: Vec::new(),
            subject: format!("Subject {}", id),
            intro: String::new(),
            seen: false,
            has_attachments: false,
            size: 100,
            created_at: Utc::now(),
        }
    }

    fn store(dir: &tempfile::TempDir) -> CacheStore {
        CacheStore::new(dir.path().join("inbox.json"), Duration::from_secs(300))
    }

    #[test]
    fn test_missing_file_is_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).load().is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = store(&dir);
        let messages = vec![message("a"), message("b")];

        cache.save(&messages);
        assert_eq!(cache.load(), Some(messages));
    }

    #[test]
    fn test_expiry_window() {
        let dir = tempfile::tempdir().unwrap();
        let cache = store(&dir);
        let now = Utc::now();

        cache.save_at(&[message("a")], now - chrono::Duration::minutes(6));
        assert!(cache.load_at(now).is_none());

        cache.save_at(&[message("a")], now - chrono::Duration::minutes(4));
        assert_eq!(cache.load_at(now).map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_corrupt_file_is_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = store(&dir);
        fs::write(dir.path().join("inbox.json"), "{not json").unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_unknown_fields_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let cache = store(&dir);
        let json = format!(
            r#"{{"messages": [], "timestamp": "{}", "version": 2}}"#,
            Utc::now().to_rfc3339()
        );
        fs::write(dir.path().join("inbox.json"), json).unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_malformed_entry_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = store(&dir);
        let path = dir.path().join("inbox.json");
        let now = Utc::now().to_rfc3339();

        // Entry missing most fields
        let sparse = format!(
            r#"{{"messages": [{{"id": "a", "from": {{"address": "a@example.test", "name": ""}}, "createdAt": "{now}"}}], "timestamp": "{now}"}}"#
        );
        fs::write(&path, sparse).unwrap();
        assert!(cache.load().is_none());

        // Complete entry with an extra field
        cache.save(&[message("a")]);
        let written = fs::read_to_string(&path).unwrap();
        fs::write(&path, written.replacen(r#""id":"a""#, r#""id":"a","bogus":1"#, 1)).unwrap();
        assert!(cache.load().is_none());

        // Sender without a display name
        cache.save(&[message("a")]);
        let written = fs::read_to_string(&path).unwrap();
        fs::write(&path, written.replacen(r#","name":"""#, "", 1)).unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_save_to_unwritable_path_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let cache = CacheStore::new(blocker.join("inbox.json"), Duration::from_secs(300));

        cache.save(&[message("a")]);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_disabled_store() {
        let cache = CacheStore::disabled();
        cache.save(&[message("a")]);
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = store(&dir);
        cache.save(&[message("a")]);
        cache.clear();
        assert!(cache.load().is_none());
    }
}
