use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeDelta, Utc};
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{info, warning};

const TEMP_SUFFIX: &str = ".readshift-tmp";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid cache key {0:?}")]
    InvalidKey(String),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::Io { source, .. } if source.kind() == ErrorKind::NotFound)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// The contents of a cache entry: JSON when the text parses as JSON, the raw
/// text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Json(Value),
    Text(String),
}

impl CachedValue {
    fn parse(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => CachedValue::Json(value),
            Err(_) => CachedValue::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            CachedValue::Json(value) => Some(value),
            CachedValue::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            CachedValue::Json(value) => Some(value),
            CachedValue::Text(_) => None,
        }
    }
}

/// Outcome of a cache read. Reads never fail outright; a broken entry is
/// reported as [`CacheRead::Failed`] so callers can tell it apart from an
/// entry that simply is not there.
#[derive(Debug)]
pub enum CacheRead {
    Fresh(CachedValue),
    Missing,
    /// The entry was older than the requested TTL and has been deleted.
    Expired,
    Failed(CacheError),
}

impl CacheRead {
    /// Collapses the outcome to "value or nothing".
    pub fn into_value(self) -> Option<CachedValue> {
        match self {
            CacheRead::Fresh(value) => Some(value),
            _ => None,
        }
    }
}

/// A namespaced key/value store with one file per key.
///
/// Entries live in `<root>/<namespace>/<key>`. The age of an entry is the age
/// of its file, so every write restarts the clock used for TTL expiry.
#[derive(Debug, Clone)]
pub struct ExpiringFileCache {
    namespace: String,
    dir: PathBuf,
}

impl ExpiringFileCache {
    /// Opens the namespace directory under `root`, creating it if needed.
    pub async fn open(root: impl AsRef<Path>, namespace: &str) -> Result<Self, CacheError> {
        let dir = root.as_ref().join(namespace);
        async_fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;

        Ok(Self {
            namespace: namespace.to_string(),
            dir,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads `key`, evicting it when it is older than `ttl_minutes`.
    pub async fn read(&self, key: &str, ttl_minutes: Option<u64>) -> CacheRead {
        self.read_at(key, ttl_minutes, Utc::now()).await
    }

    /// Same as [`read`](Self::read) with an explicit current time.
    pub async fn read_at(
        &self,
        key: &str,
        ttl_minutes: Option<u64>,
        now: DateTime<Utc>,
    ) -> CacheRead {
        let path = match self.entry_path(key) {
            Ok(path) => path,
            Err(e) => {
                warning!("Error reading cache entry: {}", e);
                return CacheRead::Failed(e);
            }
        };

        let created_at = match created_at(&path).await {
            Ok(created_at) => created_at,
            Err(e) if e.is_not_found() => return CacheRead::Missing,
            Err(e) => {
                warning!("Error reading file {}", e);
                return CacheRead::Failed(e);
            }
        };

        // an age that does not fit a TimeDelta never expires
        let ttl = ttl_minutes
            .and_then(|minutes| i64::try_from(minutes).ok())
            .and_then(TimeDelta::try_minutes);
        if let Some(ttl) = ttl {
            if now - created_at > ttl {
                info!("Cache entry {} expired, removing it", path.display());
                if let Err(e) = async_fs::remove_file(&path).await {
                    if e.kind() != ErrorKind::NotFound {
                        warning!("Cannot remove expired entry {}: {}", path.display(), e);
                    }
                }
                return CacheRead::Expired;
            }
        }

        match async_fs::read_to_string(&path).await {
            Ok(text) => {
                let value = CachedValue::parse(text);
                if let CachedValue::Text(_) = value {
                    info!("{} is not JSON, returning it as text", path.display());
                }
                CacheRead::Fresh(value)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => CacheRead::Missing,
            Err(e) => {
                let e = io_error(&path, e);
                warning!("Error reading file {}", e);
                CacheRead::Failed(e)
            }
        }
    }

    /// Serializes `value` as JSON and stores it under `key`.
    pub async fn write<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_string_pretty(value)?;
        self.write_text(key, &json).await
    }

    /// Stores `text` under `key` unchanged.
    ///
    /// The text goes to a hidden sibling file first and is then renamed over
    /// the entry, so readers see either the old or the new contents.
    pub async fn write_text(&self, key: &str, text: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        info!("Caching to {}...", path.display());

        let tmp = self.dir.join(format!(".{}{}", sanitize_key(key), TEMP_SUFFIX));
        let result = async {
            async_fs::write(&tmp, text)
                .await
                .map_err(|e| io_error(&tmp, e))?;
            async_fs::rename(&tmp, &path)
                .await
                .map_err(|e| io_error(&path, e))
        }
        .await;

        if let Err(e) = &result {
            warning!("Cannot write cache entry: {}", e);
            let _ = async_fs::remove_file(&tmp).await;
        }
        result
    }

    /// Creation time of the file backing `key`.
    pub async fn created_at(&self, key: &str) -> Result<DateTime<Utc>, CacheError> {
        created_at(&self.entry_path(key)?).await
    }

    /// Names of all entries in the namespace, sorted.
    pub async fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut entries = async_fs::read_dir(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .try_next()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| io_error(&entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') && name.ends_with(TEMP_SUFFIX) {
                continue;
            }
            keys.push(name);
        }

        keys.sort();
        Ok(keys)
    }

    /// Copies the entry to `<key>.<suffix>` next to it and returns the new
    /// path. The original is left in place.
    pub async fn preserve(&self, key: &str, suffix: &str) -> Result<PathBuf, CacheError> {
        let from = self.entry_path(key)?;
        let to = self.entry_path(&format!("{}.{}", sanitize_key(key), suffix))?;
        async_fs::copy(&from, &to)
            .await
            .map_err(|e| io_error(&from, e))?;
        Ok(to)
    }

    /// Deletes the entry. Removing a missing entry is not an error.
    pub async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        match async_fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let name = sanitize_key(key);
        if name.is_empty() || name == "." || name == ".." {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

/// Replaces path separators so a key always names a file directly inside the
/// namespace. `a/b` and `a-b` therefore share an entry.
pub fn sanitize_key(key: &str) -> String {
    key.replace(['/', '\\'], "-")
}

async fn created_at(path: &Path) -> Result<DateTime<Utc>, CacheError> {
    let metadata = async_fs::metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;
    // not every filesystem records a birth time
    let time = metadata
        .created()
        .or_else(|_| metadata.modified())
        .map_err(|e| io_error(path, e))?;
    Ok(DateTime::<Utc>::from(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_every_separator() {
        assert_eq!(sanitize_key("a/b/c"), "a-b-c");
        assert_eq!(sanitize_key("a\\b"), "a-b");
        assert_eq!(sanitize_key("plain.json"), "plain.json");
    }

    #[test]
    fn text_that_is_json_parses() {
        assert_eq!(
            CachedValue::parse("{\"a\":1}".to_string()),
            CachedValue::Json(serde_json::json!({"a": 1}))
        );
        assert_eq!(
            CachedValue::parse("hello".to_string()),
            CachedValue::Text("hello".to_string())
        );
    }
}
