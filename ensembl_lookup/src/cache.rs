//! Persistent response cache keyed by request content.

use crate::transport::{LookupRecord, LookupTransport};
use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Default cache entry lifetime: 12 hours.
pub const DEFAULT_CACHE_EXPIRY: Duration = Duration::from_secs(43_200);

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    stored_at_unix: u64,
    records: HashMap<String, LookupRecord>,
}

/// Wraps any transport with a directory-backed response cache.
///
/// Entries are JSON files named by the SHA-256 of the requested id set. A
/// fresh entry answers the batch without touching the inner transport;
/// failed batches are never cached, so a later run can recover. Cache I/O
/// problems degrade to a miss rather than failing the lookup.
pub struct CachedTransport<T> {
    inner: T,
    dir: PathBuf,
    expire_after: Duration,
}

impl<T: LookupTransport> CachedTransport<T> {
    /// Cache under `dir` with the default 12-hour expiry.
    pub fn new(inner: T, dir: impl Into<PathBuf>) -> Self {
        Self::with_expiry(inner, dir, DEFAULT_CACHE_EXPIRY)
    }

    /// Cache under `dir` with a custom expiry.
    pub fn with_expiry(inner: T, dir: impl Into<PathBuf>, expire_after: Duration) -> Self {
        CachedTransport {
            inner,
            dir: dir.into(),
            expire_after,
        }
    }

    fn entry_path(&self, ids: &[String]) -> PathBuf {
        self.dir.join(format!("{}.json", request_signature(ids)))
    }

    fn read_fresh(&self, path: &Path) -> Option<HashMap<String, LookupRecord>> {
        let bytes = fs::read(path).ok()?;
        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("discarding unreadable cache entry {}: {err}", path.display());
                return None;
            }
        };
        let age = unix_now().saturating_sub(entry.stored_at_unix);
        if age >= self.expire_after.as_secs() {
            return None;
        }
        Some(entry.records)
    }

    fn store(&self, path: &Path, records: &HashMap<String, LookupRecord>) {
        if let Err(err) = self.try_store(path, records) {
            warn!("failed to write cache entry {}: {err:#}", path.display());
        }
    }

    fn try_store(&self, path: &Path, records: &HashMap<String, LookupRecord>) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let entry = CacheEntry {
            stored_at_unix: unix_now(),
            records: records.clone(),
        };
        fs::write(path, serde_json::to_vec(&entry)?)?;
        Ok(())
    }
}

impl<T: LookupTransport> LookupTransport for CachedTransport<T> {
    fn resolve(&self, ids: &[String]) -> Result<HashMap<String, LookupRecord>> {
        let path = self.entry_path(ids);
        if let Some(records) = self.read_fresh(&path) {
            debug!("lookup cache hit for {} ids", ids.len());
            return Ok(records);
        }
        let records = self.inner.resolve(ids)?;
        self.store(&path, &records);
        Ok(records)
    }
}

fn request_signature(ids: &[String]) -> String {
    let mut hasher = Sha256::new();
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
