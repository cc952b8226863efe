//! On-disk memoization for expensive pipeline stages.
//!
//! The extractor and the renderer each own a [`FileCache`]. Entries are JSON
//! files named by the SHA-256 digest of everything that determines the result
//! (options plus input contents), so a changed input file simply misses.
//! There is no eviction policy; [`FileCache::clear`] removes the whole
//! directory.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.cache/jsdoc2md/
//! ├── explain/            # Extractor results (Vec<Doclet>)
//! │   └── 3f2a…e1.json
//! └── render/             # Rendered markdown (String)
//!     └── 9b0c…47.json
//! ```
//!
//! Reads never fail: a missing, unreadable or corrupt entry is a miss.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;

/// Content-addressed JSON store in a single directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    /// Cache in the named subdirectory of the default cache root.
    ///
    /// # Errors
    ///
    /// Fails if the cache root cannot be determined.
    pub fn in_default_root(subdir: &str) -> Result<Self> {
        Ok(Self::new(crate::config::get_cache_dir()?.join(subdir)))
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Compute a cache key from ordered parts.
    ///
    /// Each part is length-prefixed before hashing so `["ab", "c"]` and
    /// `["a", "bc"]` produce different keys.
    pub fn key<I, P>(parts: I) -> String
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut hasher = Sha256::new();
        for part in parts {
            let bytes = part.as_ref();
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        hex::encode(hasher.finalize())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load an entry, or `None` on a miss.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let content = std::fs::read(&path).ok()?;
        Self::decode(&path, &content)
    }

    /// Async variant of [`read`](Self::read).
    pub async fn read_async<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let content = async_fs::read(&path).await.ok()?;
        Self::decode(&path, &content)
    }

    fn decode<T: DeserializeOwned>(path: &Path, content: &[u8]) -> Option<T> {
        match serde_json::from_slice(content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Store an entry, replacing any previous value atomically.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created or the entry cannot be written.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_vec(value).context("Failed to serialize cache entry")?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory {}", self.dir.display()))?;

        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write cache entry {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to move cache entry into place {}", path.display()))?;
        Ok(())
    }

    /// Async variant of [`write`](Self::write).
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created or the entry cannot be written.
    pub async fn write_async<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_vec(value).context("Failed to serialize cache entry")?;
        async_fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create cache directory {}", self.dir.display()))?;

        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        async_fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write cache entry {}", tmp.display()))?;
        async_fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to move cache entry into place {}", path.display()))?;
        Ok(())
    }

    /// Remove every entry.
    ///
    /// # Errors
    ///
    /// Fails if the directory exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)
                .with_context(|| format!("Failed to clear cache {}", self.dir.display()))?;
            tracing::debug!("Cleared cache {}", self.dir.display());
        }
        Ok(())
    }

    /// Async variant of [`clear`](Self::clear).
    ///
    /// # Errors
    ///
    /// Fails if the directory exists but cannot be removed.
    pub async fn clear_async(&self) -> Result<()> {
        if async_fs::try_exists(&self.dir).await.unwrap_or(false) {
            async_fs::remove_dir_all(&self.dir)
                .await
                .with_context(|| format!("Failed to clear cache {}", self.dir.display()))?;
            tracing::debug!("Cleared cache {}", self.dir.display());
        }
        Ok(())
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        std::fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
