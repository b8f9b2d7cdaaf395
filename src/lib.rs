//! # keywheel
//!
//! Round-robin rotation over equivalent credential values discovered from
//! process configuration, with the rotation cursor persisted in a pluggable
//! backend.
//!
//! ## Overview
//!
//! `keywheel` is for the common setup where several interchangeable API keys
//! live in environment variables sharing a name prefix (`SERVICE_KEY_A`,
//! `SERVICE_KEY_B`, ...) and calls should cycle through them. The crate:
//! - Discovers candidate values by name prefix, in enumeration order
//! - Serves the value at the current cursor and advances modulo the list
//! - Persists the cursor in process memory, a JSON file, or MongoDB
//! - Converts every failure into a textual result: the public operation
//!   never returns an error and never panics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keywheel::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let wheel = KeyWheel::builder().build()?;
//!
//! // SERVICE_KEY_A=..., SERVICE_KEY_B=... -> cycles between the two
//! let rotation = wheel
//!     .next_key(&NextKeyRequest::new("SERVICE_KEY").with_storage(StorageBackend::Memory))
//!     .await;
//!
//! println!("key: {}, next index: {}", rotation.key, rotation.index);
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! - **Memory**: process-lifetime cursor map, lost on restart
//! - **Disk**: one JSON record per cursor under a configurable directory
//! - **Database** (default): one document per cursor in a MongoDB
//!   collection, configured through the `DB_USERNAME`, `DB_PASSWORD`,
//!   `DB_NAME` and `DB_CLUSTER` environment variables
//!
//! A prefix matching exactly one value short-circuits: the single key is
//! returned with index 0 and no backend is ever touched.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod stores;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{KeyWheel, KeyWheelBuilder, NextKeyRequest, Rotation};
    pub use crate::error::{Result, RotationError};
    pub use crate::stores::StorageBackend;
}
