//! Server configuration

use std::net::SocketAddr;

pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: true outside production)
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            cors_permissive: true,
        }
    }
}

impl ServerConfig {
    /// Read `AMBULANCE_API_PORT` and `AMBULANCE_API_ENVIRONMENT`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("AMBULANCE_API_PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) => config.bind_addr.set_port(port),
                Err(_) => tracing::warn!(value = %raw, "invalid port, using {}", DEFAULT_PORT),
            }
        }

        let environment = lookup("AMBULANCE_API_ENVIRONMENT").unwrap_or_default();
        config.cors_permissive = !environment.trim().eq_ignore_ascii_case("production");

        config
    }
}
