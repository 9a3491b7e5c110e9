//! Client SDK for fairdrop Dutch auctions.
//!
//! This crate prepares program transitions for a wallet to sign:
//! - Creating auctions from a sale token record
//! - Placing bids at the current price
//! - Claiming tokens and refunds after clearing
//! - Closing auctions and withdrawing revenue or unsold tokens
//! - Minting test tokens and joining or splitting token records
//!
//! It also provides [`SnapshotReader`] for reading mappings from an offline
//! JSON snapshot.

pub mod auction;
pub mod bid;
pub mod claim;
pub mod creator;
pub mod error;
pub mod query;
pub mod token;
pub mod transition;

pub use auction::CreateAuctionBuilder;
pub use bid::{place_bid, BidBuilder, PreparedBid};
pub use claim::{bid_report, claim_call, BidReport, PreparedClaim};
pub use creator::{
    close_auction_call, withdraw_payments_call, withdraw_unsold_call, withdrawable_revenue,
    withdrawable_unsold,
};
pub use error::ClientError;
pub use query::SnapshotReader;
pub use token::{join_call, mint_call, split_call};
pub use transition::{transition_label, TransitionCall};
