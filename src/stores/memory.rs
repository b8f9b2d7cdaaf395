//! In-memory cursor store.

use super::{CursorAdvance, CursorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-lifetime cursor store.
///
/// Cursors live in a single map keyed by cursor key and are lost when the
/// process exits. Distinct cursor keys never collide.
///
/// # Examples
///
/// ```rust
/// use keywheel::stores::MemoryStore;
///
/// let store = MemoryStore::new();
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    cursors: Mutex<HashMap<String, u64>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the cursor map, recovering the guard if a panicking caller
    /// poisoned it. The map holds only plain integers, so the poisoned
    /// state is safe to keep using; panicking here would break the
    /// never-panics contract of the public operation.
    fn cursors(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.cursors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CursorStore for MemoryStore {
    async fn read_index(&self, key: &str) -> Result<u64> {
        let mut cursors = self.cursors();
        Ok(*cursors.entry(key.to_string()).or_insert(0))
    }

    async fn write_index(&self, key: &str, index: u64) -> Result<()> {
        self.cursors().insert(key.to_string(), index);
        Ok(())
    }

    /// The whole read-modify-write runs under one lock acquisition so
    /// concurrent callers for the same key cannot lose an update.
    async fn advance(&self, key: &str, len: u64) -> Result<CursorAdvance> {
        let mut cursors = self.cursors();
        let slot = cursors.entry(key.to_string()).or_insert(0);
        let served = *slot % len;
        let next = (served + 1) % len;
        *slot = next;
        Ok(CursorAdvance { served, next })
    }
}
