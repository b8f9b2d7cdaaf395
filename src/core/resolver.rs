//! Candidate key discovery.

use std::env;

/// Discovers candidate values from configuration entries by name prefix.
///
/// The resolver reads the ambient process environment by default; a fixed
/// snapshot of `(name, value)` entries can be injected instead, which keeps
/// discovery deterministic in tests and embedders with their own config maps.
///
/// # Examples
///
/// ```rust
/// use keywheel::core::Resolver;
///
/// let resolver = Resolver::from_entries([
///     ("SERVICE_KEY_A", "alpha"),
///     ("SERVICE_KEY_B", "beta"),
///     ("OTHER", "ignored"),
/// ]);
/// assert_eq!(resolver.resolve("SERVICE_KEY"), vec!["alpha", "beta"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    snapshot: Option<Vec<(String, String)>>,
}

impl Resolver {
    /// Resolver over the ambient process environment.
    pub fn from_env() -> Self {
        Self { snapshot: None }
    }

    /// Resolver over a fixed list of `(name, value)` entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            snapshot: Some(
                entries
                    .into_iter()
                    .map(|(name, value)| (name.into(), value.into()))
                    .collect(),
            ),
        }
    }

    /// Return the values of all entries whose name starts with `prefix`, in
    /// source enumeration order, skipping empty values.
    ///
    /// An empty result is a normal outcome here; the orchestrator decides
    /// whether it is terminal.
    pub fn resolve(&self, prefix: &str) -> Vec<String> {
        match &self.snapshot {
            Some(entries) => entries
                .iter()
                .filter(|(name, value)| name.starts_with(prefix) && !value.is_empty())
                .map(|(_, value)| value.clone())
                .collect(),
            None => env::vars()
                .filter(|(name, value)| name.starts_with(prefix) && !value.is_empty())
                .map(|(_, value)| value)
                .collect(),
        }
    }
}
