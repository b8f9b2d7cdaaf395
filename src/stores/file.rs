//! File-backed cursor store.

use super::CursorStore;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// On-disk cursor record.
#[derive(Debug, Serialize, Deserialize)]
struct CursorRecord {
    index: u64,
}

/// File-backed cursor store.
///
/// Each cursor is one small JSON record, `<base_dir>/<cursor_key>.json`. A
/// record that is missing or cannot be parsed reads as index 0; the file is
/// created on the first write. No cross-process locking is attempted: two
/// processes racing on the same record is last-writer-wins.
///
/// # Examples
///
/// ```rust
/// use keywheel::stores::FileStore;
///
/// let store = FileStore::new("/var/lib/myapp/cursors");
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_dir`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path of the record file for `key`.
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl CursorStore for FileStore {
    /// Read failures of any kind (missing file, malformed JSON, unreadable
    /// path) mean "no record": the cursor restarts at 0 instead of surfacing
    /// the error. Existing deployments depend on this fallback, so it must
    /// not be tightened.
    async fn read_index(&self, key: &str) -> Result<u64> {
        let path = self.record_path(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<CursorRecord>(&bytes) {
                Ok(record) => Ok(record.index),
                Err(err) => {
                    tracing::debug!(path = %path.display(), %err, "unparsable cursor record, restarting at 0");
                    Ok(0)
                }
            },
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "no readable cursor record, restarting at 0");
                Ok(0)
            }
        }
    }

    async fn write_index(&self, key: &str, index: u64) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;
        let path = self.record_path(key);
        let bytes = serde_json::to_vec(&CursorRecord { index })?;

        // Write-then-rename keeps a crash from leaving a truncated record.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
