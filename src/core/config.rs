use serde::{Deserialize, Serialize};

use crate::core::errors::BridgeError;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,

    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,

    /// Public base URL used when building confirmation links.
    #[serde(default = "ServerConfig::default_public_base_url")]
    pub public_base_url: String,

    /// CORS allow-origin; "*" allows any origin (the MCP surface is public).
    #[serde(default = "ServerConfig::default_cors_allow_origin")]
    pub cors_allow_origin: String,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8888
    }
    fn default_public_base_url() -> String {
        "http://localhost:8888".to_string()
    }
    fn default_cors_allow_origin() -> String {
        "*".to_string()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            public_base_url: Self::default_public_base_url(),
            cors_allow_origin: Self::default_cors_allow_origin(),
        }
    }
}

/// Bridge provider endpoint settings. Credentials come from the environment,
/// never from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "ProviderConfig::default_base_url")]
    pub base_url: String,

    #[serde(default = "ProviderConfig::default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(skip)]
    pub client_id: String,

    #[serde(skip)]
    pub secret_key: String,
}

impl ProviderConfig {
    fn default_base_url() -> String {
        "https://api.thirdweb.com".to_string()
    }
    fn default_timeout_seconds() -> u64 {
        15
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_seconds: Self::default_timeout_seconds(),
            client_id: String::new(),
            secret_key: String::new(),
        }
    }
}

/// Step execution sequencer timing knobs. All waits are receipt/state polls
/// with exponential backoff, bounded by the timeouts here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Upper bound on waiting for the wallet to report the target chain active.
    #[serde(default = "SequencerConfig::default_switch_timeout_ms")]
    pub switch_timeout_ms: u64,

    /// Upper bound on waiting for a submitted transaction's receipt.
    #[serde(default = "SequencerConfig::default_receipt_timeout_ms")]
    pub receipt_timeout_ms: u64,

    /// First poll interval; doubles on each retry.
    #[serde(default = "SequencerConfig::default_poll_initial_ms")]
    pub poll_initial_ms: u64,

    /// Poll interval cap.
    #[serde(default = "SequencerConfig::default_poll_max_ms")]
    pub poll_max_ms: u64,
}

impl SequencerConfig {
    fn default_switch_timeout_ms() -> u64 {
        30_000
    }
    fn default_receipt_timeout_ms() -> u64 {
        180_000
    }
    fn default_poll_initial_ms() -> u64 {
        500
    }
    fn default_poll_max_ms() -> u64 {
        8_000
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            switch_timeout_ms: Self::default_switch_timeout_ms(),
            receipt_timeout_ms: Self::default_receipt_timeout_ms(),
            poll_initial_ms: Self::default_poll_initial_ms(),
            poll_max_ms: Self::default_poll_max_ms(),
        }
    }
}

/// Action store retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionStoreConfig {
    #[serde(default = "ActionStoreConfig::default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl ActionStoreConfig {
    fn default_ttl_seconds() -> u64 {
        3600
    }
}

impl Default for ActionStoreConfig {
    fn default() -> Self {
        Self { ttl_seconds: Self::default_ttl_seconds() }
    }
}

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub sequencer: SequencerConfig,
    #[serde(default)]
    pub actions: ActionStoreConfig,
}

impl GatewayConfig {
    /// Parse a config.toml document. Missing sections fall back to defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, BridgeError> {
        toml::from_str(raw).map_err(|e| BridgeError::ConfigError(e.to_string()))
    }

    /// Pull provider credentials from the environment. The server refuses to
    /// start without them; the provider rejects unauthenticated calls anyway.
    pub fn load_provider_credentials(&mut self) -> Result<(), BridgeError> {
        self.provider.client_id = std::env::var("THIRDWEB_CLIENT_ID").map_err(|_| {
            BridgeError::ConfigError("THIRDWEB_CLIENT_ID must be set".to_string())
        })?;
        self.provider.secret_key = std::env::var("THIRDWEB_SECRET_KEY").map_err(|_| {
            BridgeError::ConfigError("THIRDWEB_SECRET_KEY must be set".to_string())
        })?;
        Ok(())
    }
}
