//! Bid preparation.

use tracing::debug;

use fairdrop_pricing::{auction_status, block_phase, current_price, validate_bid};
use fairdrop_types::plaintext::{parse_token_record, u128_literal};
use fairdrop_types::{AuctionConfig, AuctionState, BlockHeight};

use crate::error::ClientError;
use crate::transition::TransitionCall;

/// A bid ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBid {
    /// The `place_bid` call
    pub call: TransitionCall,
    pub quantity: u128,
    /// Price per unit at the block the bid was prepared
    pub price: u128,
    /// Payment locked by the bid
    pub total_cost: u128,
}

/// Prepare a `place_bid` call for `quantity` units.
///
/// Checks that the auction accepts bids at `current_block`, that the payment
/// record holds the auction's payment token and that it covers
/// `quantity * price`. `state` may be omitted for an auction that has no
/// state entry yet.
pub fn place_bid(
    config: &AuctionConfig,
    state: Option<&AuctionState>,
    payment_record: &str,
    quantity: u128,
    current_block: BlockHeight,
) -> Result<PreparedBid, ClientError> {
    let status = match state {
        Some(state) => auction_status(config, state, current_block),
        None => block_phase(config, current_block),
    };
    if !status.accepts_bids() {
        return Err(ClientError::NotAcceptingBids(status));
    }

    let record = parse_token_record(payment_record)?;
    if record.token_id != config.payment_token_id {
        return Err(ClientError::WrongPaymentToken {
            expected: config.payment_token_id.clone(),
            got: record.token_id,
        });
    }

    let price = current_price(config, current_block)?;
    let total_cost = validate_bid(config, quantity, price, record.amount)?;

    debug!(
        auction_id = %config.auction_id,
        quantity,
        price,
        total_cost,
        "Prepared bid"
    );

    Ok(PreparedBid {
        call: TransitionCall::new(
            "place_bid",
            vec![
                payment_record.to_string(),
                config.auction_id.clone(),
                u128_literal(quantity),
            ],
        ),
        quantity,
        price,
        total_cost,
    })
}

/// Builder for bids with additional options.
pub struct BidBuilder<'a> {
    config: &'a AuctionConfig,
    state: Option<&'a AuctionState>,
    payment_record: Option<String>,
    quantity: u128,
}

impl<'a> BidBuilder<'a> {
    /// Create a new bid builder.
    pub fn new(config: &'a AuctionConfig) -> Self {
        Self {
            config,
            state: None,
            payment_record: None,
            quantity: 0,
        }
    }

    /// Use the auction's latest on-chain state.
    pub fn state(mut self, state: &'a AuctionState) -> Self {
        self.state = Some(state);
        self
    }

    /// Pay from `record` (record plaintext).
    pub fn payment_record(mut self, record: impl Into<String>) -> Self {
        self.payment_record = Some(record.into());
        self
    }

    /// Set the quantity of sale tokens to buy.
    pub fn quantity(mut self, quantity: u128) -> Self {
        self.quantity = quantity;
        self
    }

    /// Build the prepared bid.
    pub fn build(self, current_block: BlockHeight) -> Result<PreparedBid, ClientError> {
        let record = self
            .payment_record
            .as_deref()
            .ok_or(ClientError::MissingParameter("payment record"))?;
        place_bid(self.config, self.state, record, self.quantity, current_block)
    }
}
