//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;
use crate::infrastructure::favorites_store::FavoritesStore;
use crate::infrastructure::image::ImageCache;
use crate::infrastructure::recipes::DEFAULT_RECIPES_ENDPOINT;

pub(crate) const APP_NAME: &str = "recipe-deck";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "recipedeck";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Recipes JSON endpoint.
    #[serde(default = "default_endpoint")]
    pub recipes_endpoint: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Base directory for the image cache (`<cache_dir>/ImageCache`).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Favorites file.
    #[serde(default)]
    pub favorites_path: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_RECIPES_ENDPOINT.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(endpoint) = &args.endpoint {
            self.recipes_endpoint.clone_from(endpoint);
        }
        if let Some(timeout) = args.timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache_dir = Some(cache_dir.clone());
        }
        if let Some(favorites_path) = &args.favorites_path {
            self.favorites_path = Some(favorites_path.clone());
        }
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the image cache this configuration points at.
    #[must_use]
    pub fn image_cache(&self) -> ImageCache {
        self.cache_dir
            .as_deref()
            .map_or_else(ImageCache::default_location, ImageCache::under)
    }

    /// Returns effective favorites path.
    #[must_use]
    pub fn effective_favorites_path(&self) -> Option<PathBuf> {
        self.favorites_path
            .clone()
            .or_else(|| FavoritesStore::default_path().ok())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            recipes_endpoint: default_endpoint(),
            request_timeout_secs: default_timeout_secs(),
            cache_dir: None,
            favorites_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"
            cache_dir = "/tmp/recipes"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/recipes")));
        assert_eq!(config.recipes_endpoint, DEFAULT_RECIPES_ENDPOINT);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert!(config.log_path.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_level.to_string(), "info");
    }

    #[test]
    fn test_merge_with_args_overrides_only_given_flags() {
        let mut config = AppConfig {
            request_timeout_secs: 12,
            ..AppConfig::default()
        };
        let args = CliArgs::parse_from([
            "recipe-deck",
            "--endpoint",
            "http://localhost/recipes.json",
            "--log-level",
            "warn",
            "cuisines",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.recipes_endpoint, "http://localhost/recipes.json");
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.request_timeout_secs, 12);
    }

    #[test]
    fn test_image_cache_respects_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            cache_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };

        let cache = config.image_cache();
        assert_eq!(cache.disk().dir(), dir.path().join("ImageCache"));
    }
}
