//! Pricing engine error types.

use thiserror::Error;

/// A configuration the decay schedule cannot be computed from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("start price {start} must exceed floor price {floor}")]
    StartPriceNotAboveFloor { start: u128, floor: u128 },

    #[error("end block {end_block} must exceed start block {start_block}")]
    EmptyWindow { start_block: u32, end_block: u32 },

    #[error("price decay interval must be positive")]
    ZeroDecayInterval,

    #[error("price decay amount must be positive")]
    ZeroDecayAmount,

    #[error("maximum bid {max} is below minimum bid {min}")]
    BidBoundsInverted { min: u128, max: u128 },
}

/// Errors that can occur in the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Invalid auction configuration: {0}")]
    InvalidConfig(#[from] ConfigViolation),

    /// The bid locked less than it owes at the clearing price. Price only
    /// decreases, so this means the bid or the state is inconsistent.
    #[error("Refund underflow: {quantity} units at clearing price {clearing_price} exceed payment {payment}")]
    RefundUnderflow {
        quantity: u128,
        clearing_price: u128,
        payment: u128,
    },
}

/// Reasons a prospective bid is refused before submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidRejection {
    #[error("Enter a quantity")]
    ZeroQuantity,

    #[error("Minimum bid: {min}")]
    BelowMinimum { min: u128 },

    #[error("Maximum bid: {max}")]
    AboveMaximum { max: u128 },

    #[error("Total cost overflows")]
    CostOverflow,

    #[error("Insufficient payment balance: need {required}, have {available}")]
    InsufficientBalance { required: u128, available: u128 },
}
