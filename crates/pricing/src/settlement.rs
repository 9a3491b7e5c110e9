//! Claim settlement and demand figures.

use fairdrop_types::{AuctionConfig, AuctionState, BidRecord};
use ruint::aliases::U256;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// What a bid redeems for once the auction has cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementBreakdown {
    /// Sale tokens delivered (the bid quantity)
    pub sale_tokens: u128,
    /// Payment kept at the clearing price
    pub cost_at_clearing: u128,
    /// Payment returned to the bidder
    pub refund: u128,
    pub clearing_price: u128,
}

/// Settlement of `bid` against the final auction state.
///
/// Returns `Ok(None)` until the auction is cleared. Every bidder pays the
/// clearing price, and because the price never rises the locked payment
/// always covers it; a shortfall is reported as
/// [`PricingError::RefundUnderflow`].
pub fn settlement_breakdown(
    bid: &BidRecord,
    state: &AuctionState,
) -> Result<Option<SettlementBreakdown>, PricingError> {
    let Some(clearing_price) = state.final_price() else {
        return Ok(None);
    };

    let underflow = || PricingError::RefundUnderflow {
        quantity: bid.quantity,
        clearing_price,
        payment: bid.payment_amount,
    };

    // An overflowing product is above any u128 payment as well.
    let cost_at_clearing = bid
        .quantity
        .checked_mul(clearing_price)
        .ok_or_else(underflow)?;
    let refund = bid
        .payment_amount
        .checked_sub(cost_at_clearing)
        .ok_or_else(underflow)?;

    Ok(Some(SettlementBreakdown {
        sale_tokens: bid.quantity,
        cost_at_clearing,
        refund,
        clearing_price,
    }))
}

/// Committed quantity as a whole percentage of supply, clamped to 100.
///
/// Late concurrent bids can push `total_committed` past `supply`; only the
/// displayed figure is clamped.
pub fn demand_percent(state: &AuctionState, config: &AuctionConfig) -> u8 {
    if config.supply == 0 {
        return 0;
    }

    let percent = U256::from(state.total_committed) * U256::from(100u8) / U256::from(config.supply);
    u8::try_from(percent).map_or(100, |p| p.min(100))
}
