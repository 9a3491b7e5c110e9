//! Claims against cleared auctions.

use serde::Serialize;
use tracing::debug;

use fairdrop_pricing::{settlement_breakdown, SettlementBreakdown};
use fairdrop_types::plaintext::{parse_bid_record, u128_literal};
use fairdrop_types::{AuctionConfig, AuctionState, BidRecord, Field};

use crate::error::ClientError;
use crate::transition::TransitionCall;

/// A claim ready for submission, with what it redeems for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedClaim {
    pub call: TransitionCall,
    pub settlement: SettlementBreakdown,
}

/// A bid record's position in its auction, before or after clearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidReport {
    pub auction_id: Field,
    pub cleared: bool,
    pub quantity: u128,
    pub payment_amount: u128,
    /// Set once the auction is cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementBreakdown>,
}

/// Parse `bid_record` and check it belongs to `config`'s auction.
fn parse_bid_for(bid_record: &str, config: &AuctionConfig) -> Result<BidRecord, ClientError> {
    let bid = parse_bid_record(bid_record)?;
    if bid.auction_id != config.auction_id {
        return Err(ClientError::AuctionMismatch {
            record: bid.auction_id,
            auction: config.auction_id.clone(),
        });
    }
    Ok(bid)
}

/// Report on `bid_record` against the auction's current state.
pub fn bid_report(
    bid_record: &str,
    config: &AuctionConfig,
    state: &AuctionState,
) -> Result<BidReport, ClientError> {
    let bid = parse_bid_for(bid_record, config)?;
    let settlement = settlement_breakdown(&bid, state)?;

    Ok(BidReport {
        auction_id: bid.auction_id,
        cleared: settlement.is_some(),
        quantity: bid.quantity,
        payment_amount: bid.payment_amount,
        settlement,
    })
}

/// Prepare a `claim` call for `bid_record` (record plaintext).
pub fn claim_call(
    bid_record: &str,
    config: &AuctionConfig,
    state: &AuctionState,
) -> Result<PreparedClaim, ClientError> {
    let bid = parse_bid_for(bid_record, config)?;
    let settlement = settlement_breakdown(&bid, state)?
        .ok_or_else(|| ClientError::NotCleared(config.auction_id.clone()))?;

    debug!(
        auction_id = %config.auction_id,
        sale_tokens = settlement.sale_tokens,
        refund = settlement.refund,
        "Prepared claim"
    );

    Ok(PreparedClaim {
        call: TransitionCall::new(
            "claim",
            vec![
                bid_record.to_string(),
                u128_literal(settlement.clearing_price),
                config.sale_token_id.clone(),
                config.payment_token_id.clone(),
            ],
        ),
        settlement,
    })
}
