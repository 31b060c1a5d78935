//! Server configuration from environment variables

use std::env;
use std::net::SocketAddr;

use tracing::warn;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Broadcast channel capacity for the WebSocket feed
    pub channel_capacity: usize,
}

impl ServerConfig {
    /// Read configuration from `WEBHOOK_VIEWER_ADDR` and
    /// `WEBHOOK_VIEWER_CHANNEL_CAPACITY`, falling back to defaults on
    /// missing or unparseable values.
    pub fn from_env() -> Self {
        let bind_addr = env::var("WEBHOOK_VIEWER_ADDR")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!(%raw, "invalid WEBHOOK_VIEWER_ADDR, using default");
                    None
                }
            })
            .unwrap_or_else(|| DEFAULT_ADDR.parse().expect("default address is valid"));

        let channel_capacity = env::var("WEBHOOK_VIEWER_CHANNEL_CAPACITY")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    warn!(%raw, "invalid WEBHOOK_VIEWER_CHANNEL_CAPACITY, using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_CHANNEL_CAPACITY);

        Self {
            bind_addr,
            channel_capacity,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.parse().expect("default address is valid"),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
