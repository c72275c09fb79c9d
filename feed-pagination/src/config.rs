//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: FEED_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/feed-pagination/{service_name}/config.toml
//! 4. System directory: /etc/feed-pagination/{service_name}/config.toml
//! 5. Default values
//!
//! ```toml
//! [service]
//! name = "posts"
//! log_level = "debug"
//!
//! [pagination]
//! protocol = "https"
//! host = "api.example.com"
//! max_take = 100
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::query::DEFAULT_TAKE;

const APP_PREFIX: &str = "feed-pagination";
const ENV_PREFIX: &str = "FEED_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Pagination configuration
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            port: default_port(),
            log_level: default_log_level(),
            environment: default_environment(),
        }
    }
}

/// Pagination settings
///
/// `protocol` and `host` form the fixed base of continuation links; the
/// request's own `Host` header is never used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Scheme of continuation links
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Host (and optional port) of continuation links
    #[serde(default = "default_host")]
    pub host: String,

    /// Page size used when the request has no `take`
    #[serde(default = "default_take")]
    pub default_take: u64,

    /// Upper bound applied to `take` (unbounded when unset)
    #[serde(default)]
    pub max_take: Option<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            default_take: default_take(),
            max_take: None,
        }
    }
}

impl PaginationConfig {
    /// Base URL continuation links are built on, e.g. `http://localhost:3000`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.host)
    }
}

// Default value functions
fn default_service_name() -> String {
    APP_PREFIX.to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost:3000".to_string()
}

fn default_take() -> u64 {
    DEFAULT_TAKE
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is inferred from the binary name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| APP_PREFIX.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let defaults = Config {
            service: ServiceConfig {
                name: service_name.to_string(),
                ..ServiceConfig::default()
            },
            ..Config::default()
        };
        let mut figment = Figment::new().merge(Serialized::defaults(defaults));

        // Lowest priority first, so later merges override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the search path. Environment variables still override the file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Config file paths for a service, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX);
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Ok(path) = xdg_dirs.place_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(APP_PREFIX)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 3000);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.service.environment, "dev");
        assert_eq!(config.pagination.protocol, "http");
        assert_eq!(config.pagination.host, "localhost:3000");
        assert_eq!(config.pagination.default_take, 20);
        assert_eq!(config.pagination.max_take, None);
    }

    #[test]
    fn test_base_url() {
        let pagination = PaginationConfig {
            protocol: "https".to_string(),
            host: "api.example.com".to_string(),
            ..PaginationConfig::default()
        };
        assert_eq!(pagination.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "comments"

[pagination]
host = "feed.example.com"
max_take = 50
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "comments");
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.pagination.host, "feed.example.com");
        assert_eq!(config.pagination.protocol, "http");
        assert_eq!(config.pagination.max_take, Some(50));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config = Config::load_from("/nonexistent/feed-pagination.toml").unwrap();
        assert_eq!(config.pagination, PaginationConfig::default());
    }
}
