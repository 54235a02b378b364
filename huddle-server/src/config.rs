use std::net::SocketAddr;

/// Server runtime configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl ServerConfig {
    /// Read overrides from the environment (`HUDDLE_ADDR`), falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HUDDLE_ADDR") {
            match addr.parse() {
                Ok(addr) => config.addr = addr,
                Err(e) => tracing::warn!("Ignoring invalid HUDDLE_ADDR '{}': {}", addr, e),
            }
        }

        config
    }
}
