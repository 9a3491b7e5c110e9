//! Registry configuration.
//!
//! Identifies the deployed program and network, and tunes listing and
//! caching. Loaded from JSON; every field has a default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default program deployment.
pub const DEFAULT_PROGRAM_ID: &str = "fairdrop.aleo";

/// Default transaction fee in microcredits.
pub const DEFAULT_FEE: u64 = 100_000;

/// Configuration for an [`AuctionRegistry`](crate::AuctionRegistry).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Program whose mappings are read
    pub program_id: String,

    /// Network name passed to the RPC client
    pub network: String,

    /// RPC endpoint base URL
    pub endpoint: String,

    /// Default transaction fee in microcredits
    pub fee: u64,

    /// Maximum auctions returned by a listing, newest first
    pub list_limit: usize,

    /// Directory for the persistent config cache (in-memory only if unset)
    pub cache_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            program_id: DEFAULT_PROGRAM_ID.into(),
            network: "testnetbeta".into(),
            endpoint: "https://api.explorer.provable.com/v1".into(),
            fee: DEFAULT_FEE,
            list_limit: 50,
            cache_dir: None,
        }
    }
}

impl RegistryConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.program_id.is_empty() || !self.program_id.ends_with(".aleo") {
            return Err(ConfigValidationError::InvalidProgramId(
                self.program_id.clone(),
            ));
        }
        if self.network.is_empty() {
            return Err(ConfigValidationError::MissingNetwork);
        }
        if self.list_limit == 0 {
            return Err(ConfigValidationError::InvalidListLimit);
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid program id: {0:?}")]
    InvalidProgramId(String),

    #[error("Network name cannot be empty")]
    MissingNetwork,

    #[error("List limit must be positive")]
    InvalidListLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.program_id, "fairdrop.aleo");
        assert_eq!(config.list_limit, 50);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RegistryConfig::from_json(r#"{ "list_limit": 10, "cache_dir": "/tmp/fd" }"#)
            .unwrap();
        assert_eq!(config.list_limit, 10);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/fd")));
        assert_eq!(config.fee, 100_000);
    }

    #[test]
    fn test_invalid_program_id() {
        let config = RegistryConfig {
            program_id: "fairdrop".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidProgramId(_))
        ));
    }

    #[test]
    fn test_invalid_list_limit() {
        let config = RegistryConfig {
            list_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidListLimit));
    }
}
