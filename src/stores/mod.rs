//! Cursor store implementations.

mod cursor_store;
mod file;
mod memory;
mod remote;

pub use cursor_store::{CursorAdvance, CursorStore};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use remote::{RemoteSettings, RemoteStore};

pub(crate) use remote::connect;

/// Selector for the cursor persistence backend.
///
/// Serializes as `"MEMORY"`, `"DISK"` or `"DATABASE"` for callers that take
/// the selector from their own configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageBackend {
    /// Cursor lives in a process-wide map; lost on restart.
    Memory,
    /// Cursor lives in a JSON record under the configured cursor directory.
    Disk,
    /// Cursor lives in a MongoDB collection.
    #[default]
    Database,
}
