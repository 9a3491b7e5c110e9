//! Client error types.

use thiserror::Error;

use fairdrop_pricing::{BidRejection, ConfigViolation, PricingError};
use fairdrop_types::{AuctionStatus, ParseError};

/// Errors that can occur while preparing transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid auction parameters: {0}")]
    InvalidAuction(#[from] ConfigViolation),

    #[error("Bid rejected: {0}")]
    Bid(#[from] BidRejection),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Malformed record: {0}")]
    Record(#[from] ParseError),

    #[error("Auction is not accepting bids ({0})")]
    NotAcceptingBids(AuctionStatus),

    #[error("Payment record holds token {got}, auction expects {expected}")]
    WrongPaymentToken { expected: String, got: String },

    #[error("Bid record is for auction {record}, not {auction}")]
    AuctionMismatch { record: String, auction: String },

    #[error("Auction {0} has not been cleared")]
    NotCleared(String),

    #[error("Auction cannot be closed while {0}")]
    CannotClose(AuctionStatus),

    #[error("Withdrawal of {requested} exceeds available {available}")]
    WithdrawalExceeds { requested: u128, available: u128 },

    #[error("Cannot join token {first} with token {second}")]
    TokenMismatch { first: String, second: String },

    #[error("Split amount {amount} must be between 1 and {available} exclusive")]
    InvalidSplit { amount: u128, available: u128 },

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}
