//! Backend connection settings

use serde::{Deserialize, Serialize};

/// Object store connection configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Endpoint host:port (a scheme prefix is accepted and wins over `enable_ssl`)
    pub address: String,
    /// Access key
    pub username: String,
    /// Secret key
    pub password: String,
    /// Talk to the endpoint over https
    pub enable_ssl: bool,
    /// Signing region
    pub region: String,
    /// Use in-memory storage (for testing/development)
    pub use_memory_store: bool,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            address: "localhost:9000".to_string(),
            username: "minio-root".to_string(),
            password: "minio-root".to_string(),
            enable_ssl: false,
            region: "us-east-1".to_string(),
            use_memory_store: false,
        }
    }
}

impl CloudConfig {
    /// Full endpoint url for the S3 client
    pub fn endpoint_url(&self) -> String {
        if self.address.starts_with("http://") || self.address.starts_with("https://") {
            return self.address.clone();
        }
        let scheme = if self.enable_ssl { "https" } else { "http" };
        format!("{}://{}", scheme, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_scheme() {
        let mut config = CloudConfig::default();
        assert_eq!(config.endpoint_url(), "http://localhost:9000");

        config.enable_ssl = true;
        assert_eq!(config.endpoint_url(), "https://localhost:9000");

        config.address = "http://minio.internal:9000".to_string();
        assert_eq!(config.endpoint_url(), "http://minio.internal:9000");
    }
}
