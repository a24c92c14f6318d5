use crate::auth::env_non_empty;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_STATE_FILE: &str = "rummy_game_state.json";
const DEFAULT_AUTH_FILE: &str = "rummy_auth.json";

/// Server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Where the game document lives
    pub state_file: PathBuf,
    /// Where the admin session marker lives
    pub auth_file: PathBuf,
}

impl ServerConfig {
    /// Load from TUG_BIND_ADDR, TUG_STATE_FILE and TUG_AUTH_FILE
    pub fn from_env() -> Self {
        let default_addr = default_bind_addr();
        let bind_addr = match env_non_empty("TUG_BIND_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    "Invalid TUG_BIND_ADDR '{}': {}. Using {}",
                    raw,
                    e,
                    default_addr
                );
                default_addr
            }),
            None => default_addr,
        };

        Self {
            bind_addr,
            state_file: env_non_empty("TUG_STATE_FILE")
                .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string())
                .into(),
            auth_file: env_non_empty("TUG_AUTH_FILE")
                .unwrap_or_else(|| DEFAULT_AUTH_FILE.to_string())
                .into(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            state_file: DEFAULT_STATE_FILE.into(),
            auth_file: DEFAULT_AUTH_FILE.into(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8501))
}
