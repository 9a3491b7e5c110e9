//! Core type definitions for fairdrop Dutch auctions.
//!
//! This crate provides the shared data structures used across the workspace:
//! the immutable auction configuration, the mutable on-chain auction state,
//! wallet-held records, and the lifecycle status derived from them. The
//! [`plaintext`] module decodes and encodes the chain's textual struct form,
//! and [`tokens`] names the well-known test tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod plaintext;
pub mod tokens;

pub use error::ParseError;
pub use tokens::{token_label, token_symbol};

/// Account address (`aleo1...`).
pub type Address = String;

/// Field element literal, kept verbatim including its `field` suffix.
pub type Field = String;

/// Block height on chain.
pub type BlockHeight = u32;

/// Sentinel terminating the per-creator linked list of auctions.
pub const NULL_FIELD: &str = "0field";

// =========================
// AUCTION TYPES
// =========================

/// Auction parameters fixed at creation.
///
/// Written once by `create_auction` and never updated, so it is safe to cache
/// indefinitely keyed by `auction_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionConfig {
    pub auction_id: Field,
    pub creator: Address,
    pub sale_token_id: Field,
    pub payment_token_id: Field,

    /// Quantity of sale token offered
    pub supply: u128,

    // Pricing
    pub start_price: u128,
    pub floor_price: u128,

    // Timing
    pub start_block: BlockHeight,
    pub end_block: BlockHeight,

    /// Blocks between two price steps
    pub price_decay_blocks: u32,
    /// Amount subtracted from the price at every step
    pub price_decay_amount: u128,

    // Bid bounds (max of 0 means unlimited)
    pub max_bid_amount: u128,
    pub min_bid_amount: u128,
}

impl AuctionConfig {
    /// Number of blocks in the bidding window.
    pub fn window(&self) -> u32 {
        self.end_block.saturating_sub(self.start_block)
    }

    /// Whether `max_bid_amount` imposes a cap.
    pub fn has_bid_cap(&self) -> bool {
        self.max_bid_amount > 0
    }
}

impl FromStr for AuctionConfig {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        plaintext::parse_auction_config(s)
    }
}

/// Auction progress, updated by bid, close and clear transitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    pub total_committed: u128,
    pub total_payments: u128,
    pub supply_met: bool,
    /// Block at which supply was met (0 until then)
    pub ended_at_block: BlockHeight,
    /// Terminal: once set nothing below changes again
    pub cleared: bool,
    pub clearing_price: u128,
    pub creator_revenue: u128,
}

impl AuctionState {
    /// Clearing price, only once the auction has been cleared.
    pub fn final_price(&self) -> Option<u128> {
        self.cleared.then_some(self.clearing_price)
    }
}

impl FromStr for AuctionState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        plaintext::parse_auction_state(s)
    }
}

/// Global program counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_auctions: u64,
    pub total_bids: u64,
}

impl FromStr for Stats {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        plaintext::parse_stats(s)
    }
}

/// Private bid receipt, spent exactly once by `claim`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub owner: Address,
    pub auction_id: Field,
    /// Units of sale token bid for
    pub quantity: u128,
    /// Payment locked at bid time (`quantity * price_at_bid`)
    pub payment_amount: u128,
}

/// Private token balance record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub owner: Address,
    pub token_id: Field,
    pub amount: u128,
}

/// Auction lifecycle status as shown to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    /// Before start_block
    Upcoming,
    /// Accepting bids
    Active,
    /// Accepting bids, less than a tenth of the window left
    Ending,
    /// All supply committed
    SupplyMet,
    /// Window elapsed, not yet cleared
    Ended,
    /// Clearing price fixed, claims open
    Cleared,
}

impl AuctionStatus {
    pub const ALL: [AuctionStatus; 6] = [
        AuctionStatus::Upcoming,
        AuctionStatus::Active,
        AuctionStatus::Ending,
        AuctionStatus::SupplyMet,
        AuctionStatus::Ended,
        AuctionStatus::Cleared,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AuctionStatus::Upcoming => "Upcoming",
            AuctionStatus::Active => "Active",
            AuctionStatus::Ending => "Ending Soon",
            AuctionStatus::SupplyMet => "Supply Met",
            AuctionStatus::Ended => "Ended",
            AuctionStatus::Cleared => "Cleared",
        }
    }

    /// Whether bids are accepted in this status.
    pub fn accepts_bids(&self) -> bool {
        matches!(self, AuctionStatus::Active | AuctionStatus::Ending)
    }

    fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Upcoming => "upcoming",
            AuctionStatus::Active => "active",
            AuctionStatus::Ending => "ending",
            AuctionStatus::SupplyMet => "supply_met",
            AuctionStatus::Ended => "ended",
            AuctionStatus::Cleared => "cleared",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&AuctionStatus::SupplyMet).unwrap();
        assert_eq!(json, "\"supply_met\"");

        let decoded: AuctionStatus = serde_json::from_str("\"ending\"").unwrap();
        assert_eq!(decoded, AuctionStatus::Ending);
    }

    #[test]
    fn test_status_display_matches_serde() {
        for status in AuctionStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_accepts_bids() {
        assert!(AuctionStatus::Active.accepts_bids());
        assert!(AuctionStatus::Ending.accepts_bids());
        assert!(!AuctionStatus::Upcoming.accepts_bids());
        assert!(!AuctionStatus::SupplyMet.accepts_bids());
        assert!(!AuctionStatus::Cleared.accepts_bids());
    }

    #[test]
    fn test_final_price_requires_cleared() {
        let mut state = AuctionState {
            clearing_price: 800,
            ..Default::default()
        };
        assert_eq!(state.final_price(), None);

        state.cleared = true;
        assert_eq!(state.final_price(), Some(800));
    }
}
