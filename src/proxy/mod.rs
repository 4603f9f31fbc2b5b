//! Usage: Proxy sidecar lifecycle and its management-API bridge.

pub(crate) mod management;
pub(crate) mod manager;

pub(crate) use manager::ProxyManager;

use crate::infra::settings::DEFAULT_PROXY_PORT;
use serde::{Deserialize, Serialize};

/// Whether the local proxy is accepting connections, and where.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyStatus {
    pub running: bool,
    pub port: u16,
    pub endpoint: String,
}

impl Default for ProxyStatus {
    fn default() -> Self {
        Self {
            running: false,
            port: DEFAULT_PROXY_PORT,
            endpoint: format!("http://localhost:{DEFAULT_PROXY_PORT}/v1"),
        }
    }
}
