//! Configuration and bid validation.

use fairdrop_types::AuctionConfig;

use crate::error::{BidRejection, ConfigViolation};

/// Check the preconditions the decay schedule relies on.
pub fn validate_schedule(config: &AuctionConfig) -> Result<(), ConfigViolation> {
    if config.start_price <= config.floor_price {
        return Err(ConfigViolation::StartPriceNotAboveFloor {
            start: config.start_price,
            floor: config.floor_price,
        });
    }
    if config.end_block <= config.start_block {
        return Err(ConfigViolation::EmptyWindow {
            start_block: config.start_block,
            end_block: config.end_block,
        });
    }
    if config.price_decay_blocks == 0 {
        return Err(ConfigViolation::ZeroDecayInterval);
    }
    if config.price_decay_amount == 0 {
        return Err(ConfigViolation::ZeroDecayAmount);
    }
    Ok(())
}

/// Full configuration check: the schedule plus bid bounds.
pub fn validate_config(config: &AuctionConfig) -> Result<(), ConfigViolation> {
    validate_schedule(config)?;

    if config.has_bid_cap() && config.max_bid_amount < config.min_bid_amount {
        return Err(ConfigViolation::BidBoundsInverted {
            min: config.min_bid_amount,
            max: config.max_bid_amount,
        });
    }
    Ok(())
}

/// Check a prospective bid of `quantity` units at `current_price` against the
/// auction's bounds and the bidder's payment balance.
///
/// Returns the total cost to lock on success.
pub fn validate_bid(
    config: &AuctionConfig,
    quantity: u128,
    current_price: u128,
    payment_balance: u128,
) -> Result<u128, BidRejection> {
    if quantity == 0 {
        return Err(BidRejection::ZeroQuantity);
    }
    if quantity < config.min_bid_amount {
        return Err(BidRejection::BelowMinimum {
            min: config.min_bid_amount,
        });
    }
    if config.has_bid_cap() && quantity > config.max_bid_amount {
        return Err(BidRejection::AboveMaximum {
            max: config.max_bid_amount,
        });
    }

    let cost = quantity
        .checked_mul(current_price)
        .ok_or(BidRejection::CostOverflow)?;

    if payment_balance < cost {
        return Err(BidRejection::InsufficientBalance {
            required: cost,
            available: payment_balance,
        });
    }
    Ok(cost)
}
