//! Rotation orchestration.

use crate::core::Resolver;
use crate::error::{Result, RotationError};
use crate::stores::{
    self, CursorStore, FileStore, MemoryStore, RemoteSettings, RemoteStore, StorageBackend,
};
use mongodb::Client;
use std::path::PathBuf;
use tokio::sync::OnceCell;

/// Parameters for one rotation call.
///
/// # Examples
///
/// ```rust
/// use keywheel::prelude::*;
///
/// let request = NextKeyRequest::new("SERVICE_API_KEY").with_storage(StorageBackend::Memory);
/// ```
#[derive(Debug, Clone)]
pub struct NextKeyRequest {
    pub(crate) prefix: String,
    pub(crate) storage: StorageBackend,
}

impl NextKeyRequest {
    /// Request the next key among entries whose name starts with `prefix`.
    ///
    /// Storage defaults to [`StorageBackend::Database`].
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            storage: StorageBackend::default(),
        }
    }

    /// Select the cursor persistence backend.
    pub fn with_storage(mut self, storage: StorageBackend) -> Self {
        self.storage = storage;
        self
    }
}

/// Result of one rotation call.
///
/// [`KeyWheel::next_key`] always returns this shape; on failure `key` is
/// empty, `index` is 0 and `message` starts with `Error:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    /// The key served by this call (empty on failure).
    pub key: String,
    /// Index that will be served by the next call (post-advance).
    pub index: u64,
    /// Human-readable outcome description.
    pub message: String,
}

/// Round-robin key rotation manager.
///
/// Owns the process-scoped state: the in-memory cursor map, the cursor file
/// directory for the Disk backend, and the lazily established, cached
/// database client for the Database backend. Create one per process and
/// share it; per-call state lives on the stack.
///
/// # Examples
///
/// ```rust,no_run
/// use keywheel::prelude::*;
///
/// # async fn example() -> Result<()> {
/// let wheel = KeyWheel::builder().build()?;
/// let rotation = wheel
///     .next_key(&NextKeyRequest::new("SERVICE_API_KEY").with_storage(StorageBackend::Disk))
///     .await;
/// println!("using key {} ({})", rotation.key, rotation.message);
/// # Ok(())
/// # }
/// ```
pub struct KeyWheel {
    resolver: Resolver,
    cursor_dir: PathBuf,
    remote_settings: Option<RemoteSettings>,
    memory: MemoryStore,
    client: OnceCell<Client>,
}

impl KeyWheel {
    /// Create a new builder.
    pub fn builder() -> crate::core::KeyWheelBuilder {
        crate::core::KeyWheelBuilder::new()
    }

    pub(crate) fn from_parts(
        resolver: Resolver,
        cursor_dir: PathBuf,
        remote_settings: Option<RemoteSettings>,
    ) -> Self {
        Self {
            resolver,
            cursor_dir,
            remote_settings,
            memory: MemoryStore::new(),
            client: OnceCell::new(),
        }
    }

    /// Serve the next key for the request's prefix, advancing and persisting
    /// the rotation cursor in the selected backend.
    ///
    /// This never returns an error: every internal failure is converted into
    /// a [`Rotation`] with an empty key, index 0 and an `Error:` message.
    pub async fn next_key(&self, request: &NextKeyRequest) -> Rotation {
        match self.rotate(request).await {
            Ok(rotation) => rotation,
            Err(err) => {
                tracing::debug!(prefix = %request.prefix, %err, "rotation failed");
                Rotation {
                    key: String::new(),
                    index: 0,
                    message: format!("Error: {err}"),
                }
            }
        }
    }

    async fn rotate(&self, request: &NextKeyRequest) -> Result<Rotation> {
        let mut candidates = self.resolver.resolve(&request.prefix);
        if candidates.is_empty() {
            return Err(RotationError::NoCandidates(request.prefix.clone()));
        }

        // Single candidate: nothing to rotate and the store is never
        // touched, read or written.
        if candidates.len() == 1 {
            return Ok(Rotation {
                key: candidates.remove(0),
                index: 0,
                message: format!(
                    "Only one key found for prefix '{}'; rotation not required",
                    request.prefix
                ),
            });
        }

        let cursor_key = cursor_key(&request.prefix);
        let len = candidates.len() as u64;
        let advance = match request.storage {
            StorageBackend::Memory => self.memory.advance(&cursor_key, len).await?,
            StorageBackend::Disk => {
                FileStore::new(&self.cursor_dir)
                    .advance(&cursor_key, len)
                    .await?
            }
            StorageBackend::Database => {
                self.remote_store().await?.advance(&cursor_key, len).await?
            }
        };

        tracing::debug!(
            prefix = %request.prefix,
            storage = ?request.storage,
            served = advance.served,
            next = advance.next,
            "cursor advanced"
        );

        Ok(Rotation {
            key: candidates.swap_remove(advance.served as usize),
            index: advance.next,
            message: format!(
                "Serving key {} of {} for prefix '{}'; next index {}",
                advance.served + 1,
                len,
                request.prefix,
                advance.next
            ),
        })
    }

    /// Open the remote store, establishing and caching the client on first
    /// use. Settings come from the builder when given, otherwise from the
    /// `DB_*` environment variables at call time.
    async fn remote_store(&self) -> Result<RemoteStore> {
        let settings = match &self.remote_settings {
            Some(settings) => settings.clone(),
            None => RemoteSettings::from_env()?,
        };
        let client = self
            .client
            .get_or_try_init(|| stores::connect(&settings))
            .await?;
        Ok(RemoteStore::new(client, &settings.database))
    }
}

/// Cursor key scoping a cursor to one name prefix.
fn cursor_key(prefix: &str) -> String {
    format!("envCache_{prefix}")
}
