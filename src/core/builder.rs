//! Builder for constructing KeyWheel instances.

use crate::core::{KeyWheel, Resolver};
use crate::error::{Result, RotationError};
use crate::stores::RemoteSettings;
use std::path::PathBuf;

/// Builder for a [`KeyWheel`].
///
/// # Examples
///
/// ```rust,no_run
/// use keywheel::prelude::*;
///
/// # fn example() -> Result<()> {
/// let wheel = KeyWheel::builder()
///     .with_cursor_dir("/var/lib/myapp/cursors")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct KeyWheelBuilder {
    cursor_dir: Option<PathBuf>,
    resolver: Resolver,
    remote_settings: Option<RemoteSettings>,
}

impl KeyWheelBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            cursor_dir: None,
            resolver: Resolver::from_env(),
            remote_settings: None,
        }
    }

    /// Directory for Disk-backend cursor records.
    ///
    /// Defaults to `keywheel` under the platform configuration directory
    /// (e.g. `~/.config/keywheel` on Linux).
    pub fn with_cursor_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cursor_dir = Some(dir.into());
        self
    }

    /// Resolve candidates from a fixed snapshot of `(name, value)` entries
    /// instead of the ambient process environment.
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.resolver = Resolver::from_entries(entries);
        self
    }

    /// Connection settings for the Database backend, overriding the `DB_*`
    /// environment variables.
    pub fn with_remote_settings(mut self, settings: RemoteSettings) -> Self {
        self.remote_settings = Some(settings);
        self
    }

    /// Build the wheel.
    ///
    /// # Errors
    ///
    /// Returns an error if no cursor directory was given and the platform
    /// configuration directory cannot be determined.
    pub fn build(self) -> Result<KeyWheel> {
        let cursor_dir = match self.cursor_dir {
            Some(dir) => dir,
            None => default_cursor_dir()?,
        };
        Ok(KeyWheel::from_parts(
            self.resolver,
            cursor_dir,
            self.remote_settings,
        ))
    }
}

impl Default for KeyWheelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_cursor_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("keywheel"))
        .ok_or_else(|| {
            RotationError::ConfigurationError(
                "no platform configuration directory; set a cursor directory explicitly"
                    .to_string(),
            )
        })
}
