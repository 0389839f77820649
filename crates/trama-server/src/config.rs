use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use trama_sdk::ServiceConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub enable_cors: bool,
    pub service: ServiceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8091".parse().unwrap(),
            enable_cors: true,
            service: ServiceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8091".parse::<SocketAddr>().unwrap());
        assert!(c.enable_cors);
        assert_eq!(c.service.shared_page_id, "__shared__");
    }

    #[test]
    fn config_roundtrips_through_json() {
        let c = ServerConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let back: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bind_addr, c.bind_addr);
        assert_eq!(back.service.max_edits_per_call, c.service.max_edits_per_call);
    }
}
