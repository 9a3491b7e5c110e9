//! Registry error types.

use thiserror::Error;

use fairdrop_pricing::PricingError;
use fairdrop_types::ParseError;

/// Errors that can occur while reading auction data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Auction not found: {0}")]
    AuctionNotFound(String),

    #[error("Mapping read failed for {mapping}[{key}]: {reason}")]
    MappingRead {
        mapping: String,
        key: String,
        reason: String,
    },

    #[error("Malformed mapping value: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Cache persistence failed: {0}")]
    Cache(String),
}
