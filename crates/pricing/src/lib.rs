//! Dutch-auction pricing engine.
//!
//! Pure functions deriving an auction's price, lifecycle status and
//! settlement amounts from its immutable [`AuctionConfig`], its on-chain
//! [`AuctionState`] and the current block height:
//!
//! - [`current_price`]: step-decayed price at a block
//! - [`price_curve`]: sampled curve for charting
//! - [`auction_status`]: lifecycle phase, on-chain flags first
//! - [`settlement_breakdown`]: tokens, cost and refund of a cleared bid
//! - [`demand_percent`]: committed share of supply
//!
//! Nothing here performs I/O or holds state; every call is independent.
//!
//! [`AuctionConfig`]: fairdrop_types::AuctionConfig
//! [`AuctionState`]: fairdrop_types::AuctionState

pub mod error;
pub mod schedule;
pub mod settlement;
pub mod status;
pub mod validation;

pub use error::{BidRejection, ConfigViolation, PricingError};
pub use schedule::{current_price, price_curve, DecaySchedule, PriceCurve, PricePoint, MAX_CURVE_SAMPLES};
pub use settlement::{demand_percent, settlement_breakdown, SettlementBreakdown};
pub use status::{auction_status, block_phase, time_percent};
pub use validation::{validate_bid, validate_config, validate_schedule};
