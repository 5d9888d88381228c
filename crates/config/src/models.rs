use super::errors::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerSettings,
    pub negotiation: NegotiationSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "super::defaults::tcp_nodelay")]
    pub tcp_nodelay: bool,
    #[serde(default = "super::defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "super::defaults::max_body_size")]
    pub max_body_size_mb: usize,
    #[serde(default = "super::defaults::allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "super::defaults::max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "super::defaults::streaming_threshold_mb")]
    pub streaming_threshold_mb: u64,
    #[serde(default = "super::defaults::enable_compression")]
    pub enable_compression: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NegotiationSettings {
    /// Document roots probed in order. The first root containing a requested
    /// directory contributes its variants alongside later roots.
    pub roots: Vec<String>,
    #[serde(default = "super::defaults::cookie_name")]
    pub cookie_name: Option<String>,
    #[serde(default = "super::defaults::user_agent")]
    pub user_agent: bool,
    #[serde(default = "super::defaults::watch")]
    pub watch: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.negotiation.roots.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "at least one root directory is required".to_string(),
            ));
        }
        if self
            .negotiation
            .roots
            .iter()
            .any(|root| root.trim().is_empty())
        {
            return Err(ConfigError::InvalidConfig(
                "root directories must not be empty strings".to_string(),
            ));
        }
        Ok(())
    }
}
