use thiserror::Error;

/// Crate-wide error type for the publishing flow.
///
/// No step of the flow catches or recovers from these; every variant
/// propagates to the entry point, which logs it and exits non-zero.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Asset file error: {path}: {reason}")]
    Asset { path: String, reason: String },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage upload timed out after {seconds} seconds")]
    StorageTimeout { seconds: u64 },

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Invalid amount: {amount} at {decimals} decimals: {reason}")]
    InvalidAmount {
        amount: u64,
        decimals: u8,
        reason: String,
    },

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    pub fn invalid_address(address: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        PublishError::InvalidAddress {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    pub fn asset(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        PublishError::Asset {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let err = PublishError::InvalidAmount {
            amount: 100,
            decimals: 12,
            reason: "decimals above supported maximum".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("100"));
        assert!(text.contains("12"));

        let err = PublishError::Asset {
            path: "assets/token.png".to_string(),
            reason: "not found".to_string(),
        };
        assert!(err.to_string().contains("assets/token.png"));
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PublishError = parse_err.into();
        assert!(matches!(err, PublishError::Serialization(_)));
    }
}
