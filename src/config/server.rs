//! Server configuration

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

use super::error::ValidationError;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment name
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// CORS allowed origins (comma-separated). Required.
    #[serde(default)]
    pub cors_origins: String,

    /// Public URL of the website; checkout redirects are built from it.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Reverse proxy addresses whose forwarding headers are believed
    /// (comma-separated). Empty means the socket peer is the client.
    #[serde(default)]
    pub trusted_proxies: String,
}

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidAddress(raw))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Get CORS origins as a vector
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn trusted_proxies_list(&self) -> Result<Vec<IpAddr>, ValidationError> {
        self.trusted_proxies
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse()
                    .map_err(|_| ValidationError::InvalidTrustedProxy(s.to_string()))
            })
            .collect()
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        let origins = self.cors_origins_list();
        if origins.is_empty() {
            return Err(ValidationError::MissingRequired("SERVER__CORS_ORIGINS"));
        }
        if !self.is_development() && origins.iter().any(|o| o == "*") {
            return Err(ValidationError::WildcardCorsOrigin);
        }
        self.trusted_proxies_list()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: String::new(),
            public_base_url: default_public_base_url(),
            trusted_proxies: String::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> Environment {
    Environment::Development
}

fn default_log_level() -> String {
    "info,union_portal=debug,sqlx=warn".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_public_base_url() -> String {
    "http://localhost:5173".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_origins(origins: &str) -> ServerConfig {
        ServerConfig {
            cors_origins: origins.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_host_is_reported() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..with_origins("http://localhost:5173")
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_cors_origins_parsing() {
        let origins = with_origins("http://localhost:5173, http://localhost:3000,").cors_origins_list();
        assert_eq!(origins, vec!["http://localhost:5173", "http://localhost:3000"]);
    }

    #[test]
    fn test_cors_origins_required() {
        assert_eq!(
            ServerConfig::default().validate(),
            Err(ValidationError::MissingRequired("SERVER__CORS_ORIGINS"))
        );
    }

    #[test]
    fn test_wildcard_only_in_development() {
        let mut config = with_origins("*");
        assert!(config.validate().is_ok());

        config.environment = Environment::Production;
        assert_eq!(config.validate(), Err(ValidationError::WildcardCorsOrigin));
    }

    #[test]
    fn test_trusted_proxies_parsing() {
        let mut config = with_origins("https://sindicato.example");
        assert!(config.trusted_proxies_list().unwrap().is_empty());

        config.trusted_proxies = "10.0.0.1, ::1,".to_string();
        assert_eq!(
            config.trusted_proxies_list().unwrap(),
            vec!["10.0.0.1".parse::<IpAddr>().unwrap(), "::1".parse().unwrap()]
        );

        config.trusted_proxies = "10.0.0.0/8".to_string();
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTrustedProxy("10.0.0.0/8".to_string()))
        );
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let config = ServerConfig {
            request_timeout_secs: 0,
            ..with_origins("https://sindicato.example")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
