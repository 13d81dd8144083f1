//! HTTP server settings

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::net::SocketAddr;

/// Listen address of a service
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub server_host: String,
    pub server_port: u16,
}

impl ServerSettings {
    /// Load settings from `SERVER_HOST` and `SERVER_PORT`
    ///
    /// `default_port` differs per service so both can run on one host.
    pub fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", i64::from(default_port))?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server_host, self.server_port).parse()
    }
}

/// Whether the demo-data seeding endpoint is switched on (`SEED_ENABLED`)
pub fn seed_enabled() -> bool {
    std::env::var("SEED_ENABLED")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
