//! Dataset location and transfer configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the dataset cache directory.
pub const DATA_DIR_ENV: &str = "DIGITSTRIP_DATA_DIR";
/// Mirror hosting the gzip-compressed MNIST record files.
pub const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com/cvdf-datasets/mnist";
/// Deadline applied to each remote request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where dataset files are cached locally and fetched from remotely.
///
/// # Examples
/// ```
/// use digitstrip_core::DatasetConfig;
///
/// let config = DatasetConfig::default().with_cache_dir("/tmp/digits");
/// assert_eq!(config.cache_dir, std::path::PathBuf::from("/tmp/digits"));
/// ```
#[derive(Clone, Debug)]
pub struct DatasetConfig {
    /// Local directory holding the decompressed record files.
    pub cache_dir: PathBuf,
    /// Base URL that hosts `<name>.gz` archives.
    pub base_url: String,
    /// Global deadline for one remote request, body included.
    pub timeout: Option<Duration>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl DatasetConfig {
    /// Overrides the cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Overrides the remote base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Overrides the per-request deadline. `None` disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Resolves the cache directory from the environment.
///
/// Order: `DIGITSTRIP_DATA_DIR`, `$XDG_CACHE_HOME/digitstrip/mnist`,
/// `$HOME/.cache/digitstrip/mnist`, then the system temp directory.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    if let Some(explicit) = env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(explicit);
    }

    if let Some(xdg_cache) = env::var_os("XDG_CACHE_HOME") {
        return PathBuf::from(xdg_cache).join("digitstrip").join("mnist");
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".cache")
            .join("digitstrip")
            .join("mnist");
    }

    env::temp_dir().join("digitstrip").join("mnist")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_fields() {
        let config = DatasetConfig::default()
            .with_cache_dir("cache")
            .with_base_url("https://example.test/mnist")
            .with_timeout(None);
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
        assert_eq!(config.base_url, "https://example.test/mnist");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn default_uses_public_mirror() {
        let config = DatasetConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
    }
}
