//! Cursor store trait.

use crate::error::Result;
use async_trait::async_trait;

/// Outcome of one cursor advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorAdvance {
    /// Index of the value served by this call.
    pub served: u64,
    /// Index persisted for the next call.
    pub next: u64,
}

/// Persistence strategy for rotation cursors.
///
/// Implementations provide "read the current index for a named cursor" and
/// "write the new index back"; the provided [`advance`](CursorStore::advance)
/// method implements the shared read-modify-write cycle on top of them. The
/// orchestration layer is written once against this trait.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Read the current index for `key`.
    ///
    /// A missing record reads as 0. The store lazily materializes the record
    /// if its medium requires it: the Memory store initializes the map entry,
    /// the Remote store inserts a zero document, the File store waits for the
    /// first write.
    async fn read_index(&self, key: &str) -> Result<u64>;

    /// Persist `index` for `key`, creating the record if needed.
    async fn write_index(&self, key: &str, index: u64) -> Result<()>;

    /// Advance the cursor for `key` over a candidate list of length `len`.
    ///
    /// Reads the current index, clamps it into range in case the candidate
    /// list shrank since the last call, persists `(current + 1) % len`, and
    /// returns both indices. `len` must be at least 2; single-element lists
    /// are short-circuited by the caller and never reach a store.
    async fn advance(&self, key: &str, len: u64) -> Result<CursorAdvance> {
        let served = self.read_index(key).await? % len;
        let next = (served + 1) % len;
        self.write_index(key, next).await?;
        Ok(CursorAdvance { served, next })
    }
}
