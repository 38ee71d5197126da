//! # Configuration
//!
//! Robolog configuration is managed by [`clapfig`], which handles layered loading
//! from TOML files and environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `ROBOLOG__CACHE_TTL_SECS`, `ROBOLOG__RETRY_ATTEMPTS`, etc.
//! 2. **Workbook Config**: `<workbook>/robolog.toml`.
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `credentials_file` | `credentials.json` | Service identity file, relative to the workbook |
//! | `cache_ttl_secs` | `300` | How long a fetched sheet is reused |
//! | `retry_attempts` | `3` | Reads attempted while rate limited |
//! | `retry_base_delay_secs` | `2` | First backoff wait; doubles per retry |

use crate::cache::{ReadCache, RetryPolicy};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for robolog, stored in `robolog.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RobologConfig {
    /// Service identity file. Relative paths resolve against the workbook directory.
    #[config(default = "credentials.json")]
    pub credentials_file: String,

    /// Seconds a fetched sheet stays fresh.
    #[config(default = 300)]
    pub cache_ttl_secs: u64,

    /// Total read attempts when the backend is rate limiting.
    #[config(default = 3)]
    pub retry_attempts: u32,

    #[config(default = 2)]
    pub retry_base_delay_secs: u64,
}

impl Default for RobologConfig {
    fn default() -> Self {
        Self {
            credentials_file: "credentials.json".to_string(),
            cache_ttl_secs: 300,
            retry_attempts: 3,
            retry_base_delay_secs: 2,
        }
    }
}

impl RobologConfig {
    pub fn credentials_path(&self, workbook_dir: &Path) -> PathBuf {
        let path = PathBuf::from(&self.credentials_file);
        if path.is_absolute() {
            path
        } else {
            workbook_dir.join(path)
        }
    }

    /// Retry policy; at least one attempt is always made.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts.max(1),
            base_delay: Duration::from_secs(self.retry_base_delay_secs),
        }
    }

    pub fn read_cache(&self) -> ReadCache {
        ReadCache::new(
            Duration::from_secs(self.cache_ttl_secs),
            self.retry_policy(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RobologConfig::default();
        assert_eq!(config.credentials_file, "credentials.json");
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_credentials_path_relative_to_workbook() {
        let config = RobologConfig::default();
        assert_eq!(
            config.credentials_path(Path::new("/data/fleet")),
            PathBuf::from("/data/fleet/credentials.json")
        );
    }

    #[test]
    fn test_credentials_path_absolute_kept() {
        let config = RobologConfig {
            credentials_file: "/etc/robolog/key.json".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.credentials_path(Path::new("/data/fleet")),
            PathBuf::from("/etc/robolog/key.json")
        );
    }

    #[test]
    fn test_zero_attempts_still_reads_once() {
        let config = RobologConfig {
            retry_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.retry_policy().max_attempts, 1);
    }

    #[test]
    fn test_read_cache_uses_configured_ttl() {
        let config = RobologConfig {
            cache_ttl_secs: 10,
            retry_base_delay_secs: 0,
            ..Default::default()
        };
        let cache = config.read_cache();
        assert_eq!(cache.ttl(), Duration::from_secs(10));
        assert_eq!(cache.retry().base_delay, Duration::ZERO);
    }
}
