//! Application settings loaded from an optional TOML file.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use insights_catalog::{FLAGSHIP_DEFAULT_COLUMN, FLAGSHIP_SOURCE};

/// Dashboard page shipped with this crate.
pub const DEFAULT_TEMPLATE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/index.html");

/// Largest `top_n` the HTTP API accepts by default.
pub const DEFAULT_MAX_TOP_N: usize = 50;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level settings.
///
/// ```toml
/// data_dir = "data"
///
/// [server]
/// host = "127.0.0.1"
/// port = 8000
/// template = "/srv/insights/index.html"
///
/// [analysis]
/// default_source = "stackoverflow_2023"
/// default_column = "LanguageHaveWorkedWith"
/// default_top_n = 10
/// max_top_n = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding bundles and extracted source directories.
    pub data_dir: PathBuf,
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            server: ServerConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Dashboard page served at `/`.
    pub template: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            template: PathBuf::from(DEFAULT_TEMPLATE),
        }
    }
}

impl ServerConfig {
    /// Listen address from `host` (an IPv4 or IPv6 literal) and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.trim().parse().map_err(|e| {
            ConfigError::Invalid(format!("bad listen host '{}': {e}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Defaults and limits for technology-usage queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub default_source: String,
    pub default_column: String,
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_source: FLAGSHIP_SOURCE.to_string(),
            default_column: FLAGSHIP_DEFAULT_COLUMN.to_string(),
            default_top_n: 10,
            max_top_n: DEFAULT_MAX_TOP_N,
        }
    }
}

impl AppConfig {
    /// Loads settings from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks the top-N limits are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if analysis.max_top_n == 0 {
            return Err(ConfigError::Invalid(
                "analysis.max_top_n must be at least 1".to_string(),
            ));
        }
        if !(1..=analysis.max_top_n).contains(&analysis.default_top_n) {
            return Err(ConfigError::Invalid(format!(
                "analysis.default_top_n must be between 1 and {}, got {}",
                analysis.max_top_n, analysis.default_top_n
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.analysis.default_source, "stackoverflow_2023");
        assert_eq!(config.analysis.default_column, "LanguageHaveWorkedWith");
        assert_eq!(config.analysis.max_top_n, 50);
        assert_eq!(
            config.server.socket_addr().unwrap().to_string(),
            "127.0.0.1:8000"
        );
    }

    #[test]
    fn test_default_template_ships_with_crate() {
        let config = AppConfig::default();
        assert!(config.server.template.is_absolute());
        assert!(config.server.template.is_file());
    }

    #[test]
    fn test_socket_addr_ipv6() {
        let server = ServerConfig {
            host: "::1".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "[::1]:8000");

        let server = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(server.socket_addr(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("insights.toml");
        fs::write(&path, "data_dir = \"/srv/surveys\"\n[server]\nport = 9000\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/surveys"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    fn test_rejects_default_above_max() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("insights.toml");
        fs::write(&path, "[analysis]\ndefault_top_n = 20\nmax_top_n = 5\n").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/insights.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
