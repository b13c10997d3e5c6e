use std::fmt;

/// Custom error type for bridge gateway operations.
#[derive(Debug)]
pub enum BridgeError {
    /// Configuration-related errors.
    ConfigError(String),
    /// Request validation errors.
    ValidationError(String),
    /// Chain id not present in the registry.
    UnsupportedChain(String),
    /// Bridge provider rejected the request.
    ProviderError(String),
    /// Bridge provider rejected our credentials.
    ProviderAuthError(String),
    /// Provider found no route for the requested chain/token pair.
    RouteNotFound(String),
    /// Provider rate limit hit.
    RateLimited(String),
    /// Transport-level failures talking to the provider.
    NetworkError(String),
    /// Wallet rejected a prompt or disconnected mid-sequence.
    WalletError(String),
    /// Chain switch was requested but the wallet never reached the target chain.
    ChainSwitchError(String),
    /// A submitted transaction reverted or its receipt reported failure.
    TransactionFailed(String),
    /// Bounded wait elapsed (receipt polling, chain switch).
    TimeoutError(String),
    /// Resource not found errors.
    NotFoundError(String),
    /// Serialization/deserialization errors.
    SerializationError(String),
    /// Internal errors.
    InternalError(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            BridgeError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            BridgeError::UnsupportedChain(msg) => write!(f, "Unsupported chain: {}", msg),
            BridgeError::ProviderError(msg) => write!(f, "Bridge provider error: {}", msg),
            BridgeError::ProviderAuthError(msg) => {
                write!(f, "Bridge provider authentication error: {}", msg)
            }
            BridgeError::RouteNotFound(msg) => write!(f, "No bridge route: {}", msg),
            BridgeError::RateLimited(msg) => write!(f, "Provider rate limit: {}", msg),
            BridgeError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            BridgeError::WalletError(msg) => write!(f, "Wallet error: {}", msg),
            BridgeError::ChainSwitchError(msg) => write!(f, "Chain switch error: {}", msg),
            BridgeError::TransactionFailed(msg) => write!(f, "Transaction failed: {}", msg),
            BridgeError::TimeoutError(msg) => write!(f, "Timeout error: {}", msg),
            BridgeError::NotFoundError(msg) => write!(f, "Not found: {}", msg),
            BridgeError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            BridgeError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BridgeError {}

impl BridgeError {
    /// Whether a caller could reasonably retry the operation later.
    /// Validation and wallet rejections are terminal; transport hiccups are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::NetworkError(_)
                | BridgeError::TimeoutError(_)
                | BridgeError::RateLimited(_)
        )
    }

    /// Stable machine-readable code used in HTTP error responses.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::ConfigError(_) => "CONFIG_ERROR",
            BridgeError::ValidationError(_) => "INVALID_INPUT",
            BridgeError::UnsupportedChain(_) => "UNSUPPORTED_CHAIN",
            BridgeError::ProviderError(_) => "PROVIDER_ERROR",
            BridgeError::ProviderAuthError(_) => "PROVIDER_AUTH_FAILED",
            BridgeError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            BridgeError::RateLimited(_) => "RATE_LIMITED",
            BridgeError::NetworkError(_) => "NETWORK_ERROR",
            BridgeError::WalletError(_) => "WALLET_ERROR",
            BridgeError::ChainSwitchError(_) => "CHAIN_SWITCH_FAILED",
            BridgeError::TransactionFailed(_) => "TRANSACTION_FAILED",
            BridgeError::TimeoutError(_) => "TIMEOUT",
            BridgeError::NotFoundError(_) => "NOT_FOUND",
            BridgeError::SerializationError(_) => "SERIALIZATION_ERROR",
            BridgeError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<anyhow::Error> for BridgeError {
    fn from(err: anyhow::Error) -> Self {
        BridgeError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unsupported_chain() {
        let err = BridgeError::UnsupportedChain("999999".to_string());
        assert_eq!(format!("{}", err), "Unsupported chain: 999999");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(BridgeError::NetworkError("conn reset".into()).is_retryable());
        assert!(BridgeError::RateLimited("429".into()).is_retryable());
        assert!(!BridgeError::ValidationError("missing amount".into()).is_retryable());
        assert!(!BridgeError::WalletError("user rejected".into()).is_retryable());
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let bridge_err: BridgeError = json_err.into();
        assert!(matches!(bridge_err, BridgeError::SerializationError(_)));
    }
}
