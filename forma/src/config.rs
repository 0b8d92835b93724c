use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;

/// Default wall-clock budget for a single search: ten minutes.
const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 600_000;

/// The two externally-tunable knobs. `MAX_CHAIN_LEN` is deliberately not
/// here, since it's a protocol constant baked into persisted path-store
/// entries, not a runtime tunable.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub search_timeout: Duration,
    pub format_cache_path: PathBuf,
    pub path_store_path: PathBuf,
}

impl RouterConfig {
    /// Resolve configuration from the environment: read an env var, fall
    /// back to a sane default on absence or parse failure.
    pub fn from_env() -> anyhow::Result<Self> {
        let search_timeout_ms = std::env::var("SEARCH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEARCH_TIMEOUT_MS);

        let cache_dir = cache_destination()?;
        let format_cache_path = std::env::var("FORMA_FORMAT_CACHE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| cache_dir.join("format-cache.json"));
        let path_store_path = std::env::var("FORMA_PATH_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| cache_dir.join("path-store.json"));

        Ok(Self {
            search_timeout: Duration::from_millis(search_timeout_ms),
            format_cache_path,
            path_store_path,
        })
    }
}

fn cache_destination() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CACHE_HOME") {
        Ok(PathBuf::from(path).join("forma"))
    } else if let Ok(path) = std::env::var("HOME") {
        Ok(PathBuf::from(path).join(".cache").join("forma"))
    } else {
        Err(anyhow!("both XDG_CACHE_HOME and HOME are unset"))
    }
}
