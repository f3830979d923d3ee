//! Gateway configuration

use docs_hub_storage::CloudConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "DOCS_HUB";

/// Complete process configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cloud: CloudConfig,
}

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// host:port to listen on
    pub address: String,
    /// Default log filter when RUST_LOG is unset
    pub logger_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Public base url used in self-signed share links
    pub public_url: Option<String>,
    /// Grace period for in-flight requests on shutdown (seconds)
    pub shutdown_timeout_secs: u64,
    /// Per-request deadline (seconds)
    pub request_timeout_secs: u64,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:2866".to_string(),
            logger_level: "info".to_string(),
            log_json: false,
            public_url: None,
            shutdown_timeout_secs: 10,
            request_timeout_secs: 300,
            max_body_size: 512 * 1024 * 1024, // 512 MiB
            cors_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> &str {
        &self.address
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base url for links served by this gateway
    pub fn share_base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}", self.address),
        }
    }
}

impl AppConfig {
    /// Layer defaults, an optional TOML file and `DOCS_HUB_*` variables.
    ///
    /// Environment keys use `__` between section and field, e.g.
    /// `DOCS_HUB_CLOUD__ADDRESS=minio:9000`.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:2866");
        assert_eq!(config.server.logger_level, "info");
        assert_eq!(config.cloud.address, "localhost:9000");
        assert_eq!(config.cloud.username, "minio-root");
        assert!(!config.cloud.enable_ssl);
        assert_eq!(config.server.shutdown_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
address = "127.0.0.1:8080"
logger_level = "debug"

[cloud]
address = "minio.internal:9000"
enable_ssl = true
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8080");
        assert_eq!(config.server.logger_level, "debug");
        assert_eq!(config.cloud.address, "minio.internal:9000");
        assert!(config.cloud.enable_ssl);
        // untouched fields keep their defaults
        assert_eq!(config.cloud.password, "minio-root");
        assert_eq!(config.server.request_timeout_secs, 300);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_share_base_url() {
        let mut server = ServerConfig::default();
        assert_eq!(server.share_base_url(), "http://0.0.0.0:2866");

        server.public_url = Some("https://docs.example.com/".to_string());
        assert_eq!(server.share_base_url(), "https://docs.example.com");
    }
}
