use serde::{Deserialize, Serialize};

/// `listen_addr` value meaning the UDP socket is handed over by the service
/// manager instead of being bound by the process.
pub const SOCKET_ACTIVATION: &str = "SOCKET_ACTIVATION";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl ServerConfig {
    pub fn uses_socket_activation(&self) -> bool {
        self.listen_addr == SOCKET_ACTIVATION
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:53".to_string()
}
