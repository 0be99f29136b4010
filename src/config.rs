use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Defaults
// =============================================================================

/// Endpoint queried when no URL is configured
pub const DEFAULT_CHECK_URL: &str = "http://update_checker.bryceboe.com/check";

/// Time a check result stays fresh, in seconds (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Client-side timeout for the update request in milliseconds (1 second)
pub const REQUEST_TIMEOUT_MS: u64 = 1_000;

/// File name of the shared result cache inside the temporary directory
pub const CACHE_FILE_NAME: &str = "update_checker_cache.json";

/// Update checker configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerConfig {
    /// Endpoint URL; `None` means [`DEFAULT_CHECK_URL`]
    pub url: Option<String>,
    pub cache: CacheConfig,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            url: None,
            cache: CacheConfig::default(),
            timeout_ms: REQUEST_TIMEOUT_MS,
        }
    }
}

impl CheckerConfig {
    /// Returns the configured endpoint, falling back to the well-known address.
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_CHECK_URL)
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Freshness window in seconds
    pub ttl_secs: u64,
    /// Location of the shared cache file; `None` means [`cache_path`]
    pub path: Option<PathBuf>,
    /// Whether results are shared with other processes through the cache file
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            path: None,
            persist: true,
        }
    }
}

impl CacheConfig {
    /// Returns the cache file to use, or `None` when persistence is disabled.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.persist
            .then(|| self.path.clone().unwrap_or_else(cache_path))
    }
}

/// Returns the path to the shared cache file in the platform temporary directory.
pub fn cache_path() -> PathBuf {
    cache_path_in(std::env::temp_dir())
}

fn cache_path_in(temp_dir: PathBuf) -> PathBuf {
    temp_dir.join(CACHE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn checker_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<CheckerConfig>(json!({
            "cache": {
                "ttlSecs": 60
            }
        }))
        .unwrap();

        assert_eq!(result.cache.ttl_secs, 60);
        assert!(result.cache.persist);
        assert_eq!(result.url, None);
        assert_eq!(result.timeout_ms, REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn checker_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<CheckerConfig>(json!({
            "url": "http://localhost:8080/check",
            "cache": {
                "ttlSecs": 10,
                "path": "/var/tmp/checks.json",
                "persist": false
            },
            "timeoutMs": 250
        }))
        .unwrap();

        assert_eq!(
            result,
            CheckerConfig {
                url: Some("http://localhost:8080/check".to_string()),
                cache: CacheConfig {
                    ttl_secs: 10,
                    path: Some(PathBuf::from("/var/tmp/checks.json")),
                    persist: false,
                },
                timeout_ms: 250,
            }
        );
    }

    #[test]
    fn url_falls_back_to_default_endpoint() {
        assert_eq!(CheckerConfig::default().url(), DEFAULT_CHECK_URL);
    }

    #[test]
    fn store_path_is_none_when_persistence_disabled() {
        let config = CacheConfig {
            persist: false,
            ..CacheConfig::default()
        };

        assert_eq!(config.store_path(), None);
    }

    #[test]
    fn store_path_prefers_configured_path() {
        let config = CacheConfig {
            path: Some(PathBuf::from("/tmp/custom.json")),
            ..CacheConfig::default()
        };

        assert_eq!(config.store_path(), Some(PathBuf::from("/tmp/custom.json")));
    }

    #[test]
    fn cache_path_in_joins_file_name() {
        let path = cache_path_in(PathBuf::from("/tmp"));
        assert_eq!(path, PathBuf::from("/tmp/update_checker_cache.json"));
    }
}
