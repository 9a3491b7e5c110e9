//! Auction creation.

use tracing::debug;

use fairdrop_pricing::validate_config;
use fairdrop_types::plaintext::{parse_token_record, u128_literal, u32_literal};
use fairdrop_types::{AuctionConfig, BlockHeight, Field, NULL_FIELD};

use crate::error::ClientError;
use crate::transition::TransitionCall;

/// Builder for `create_auction` calls.
///
/// The sale record is deposited whole: its owner becomes the creator, its
/// token id the sale token and its amount the supply.
#[derive(Clone, Debug, Default)]
pub struct CreateAuctionBuilder {
    sale_record: String,
    payment_token_id: Option<Field>,
    start_price: u128,
    floor_price: u128,
    start_block: BlockHeight,
    end_block: BlockHeight,
    price_decay_blocks: u32,
    price_decay_amount: u128,
    max_bid_amount: u128,
    min_bid_amount: u128,
}

impl CreateAuctionBuilder {
    /// Start a builder depositing `sale_record` (record plaintext).
    pub fn new(sale_record: impl Into<String>) -> Self {
        Self {
            sale_record: sale_record.into(),
            ..Default::default()
        }
    }

    pub fn payment_token(mut self, token_id: impl Into<Field>) -> Self {
        self.payment_token_id = Some(token_id.into());
        self
    }

    pub fn prices(mut self, start_price: u128, floor_price: u128) -> Self {
        self.start_price = start_price;
        self.floor_price = floor_price;
        self
    }

    pub fn window(mut self, start_block: BlockHeight, end_block: BlockHeight) -> Self {
        self.start_block = start_block;
        self.end_block = end_block;
        self
    }

    /// Lower the price by `amount` every `blocks` blocks.
    pub fn decay(mut self, blocks: u32, amount: u128) -> Self {
        self.price_decay_blocks = blocks;
        self.price_decay_amount = amount;
        self
    }

    /// Per-bid quantity bounds. A `max` of zero means uncapped.
    pub fn bid_bounds(mut self, min: u128, max: u128) -> Self {
        self.min_bid_amount = min;
        self.max_bid_amount = max;
        self
    }

    /// The config the auction would be created with, unvalidated.
    ///
    /// Useful for previewing the price curve while parameters are edited.
    pub fn preview_config(&self) -> Result<AuctionConfig, ClientError> {
        let record = parse_token_record(&self.sale_record)?;
        Ok(AuctionConfig {
            auction_id: NULL_FIELD.to_string(),
            creator: record.owner,
            sale_token_id: record.token_id,
            payment_token_id: self.payment_token_id.clone().unwrap_or_default(),
            supply: record.amount,
            start_price: self.start_price,
            floor_price: self.floor_price,
            start_block: self.start_block,
            end_block: self.end_block,
            price_decay_blocks: self.price_decay_blocks,
            price_decay_amount: self.price_decay_amount,
            max_bid_amount: self.max_bid_amount,
            min_bid_amount: self.min_bid_amount,
        })
    }

    /// Validate the parameters and build the call.
    pub fn build(&self) -> Result<TransitionCall, ClientError> {
        let payment_token_id = self
            .payment_token_id
            .as_ref()
            .ok_or(ClientError::MissingParameter("payment token"))?;
        if self.start_price == 0 {
            return Err(ClientError::MissingParameter("start price"));
        }
        if self.floor_price == 0 {
            return Err(ClientError::MissingParameter("floor price"));
        }
        if self.start_block == 0 {
            return Err(ClientError::MissingParameter("start block"));
        }
        if self.min_bid_amount == 0 {
            return Err(ClientError::MissingParameter("minimum bid amount"));
        }

        let config = self.preview_config()?;
        if config.supply == 0 {
            return Err(ClientError::MissingParameter("sale supply"));
        }
        validate_config(&config)?;

        debug!(
            creator = %config.creator,
            supply = config.supply,
            start_block = config.start_block,
            end_block = config.end_block,
            "Prepared create_auction"
        );

        Ok(TransitionCall::new(
            "create_auction",
            vec![
                self.sale_record.clone(),
                payment_token_id.clone(),
                u128_literal(self.start_price),
                u128_literal(self.floor_price),
                u32_literal(self.start_block),
                u32_literal(self.end_block),
                u32_literal(self.price_decay_blocks),
                u128_literal(self.price_decay_amount),
                u128_literal(self.max_bid_amount),
                u128_literal(self.min_bid_amount),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairdrop_pricing::{price_curve, ConfigViolation};

    const SALE_RECORD: &str = "{
  owner: aleo1creator.private,
  token_id: 1field.private,
  amount: 1000u128.private,
  _nonce: 123group.public
}";

    fn builder() -> CreateAuctionBuilder {
        CreateAuctionBuilder::new(SALE_RECORD)
            .payment_token("4field")
            .prices(1000, 100)
            .window(10, 1010)
            .decay(100, 90)
            .bid_bounds(1, 0)
    }

    #[test]
    fn test_build_inputs() {
        let call = builder().build().unwrap();

        assert_eq!(call.function, "create_auction");
        assert_eq!(
            call.inputs[1..],
            [
                "4field", "1000u128", "100u128", "10u32", "1010u32", "100u32", "90u128", "0u128",
                "1u128",
            ]
        );
        assert_eq!(call.inputs[0], SALE_RECORD);
    }

    #[test]
    fn test_preview_config() {
        let config = builder().preview_config().unwrap();
        assert_eq!(config.creator, "aleo1creator");
        assert_eq!(config.sale_token_id, "1field");
        assert_eq!(config.supply, 1000);

        let curve: Vec<_> = price_curve(&config).unwrap().collect();
        assert_eq!(curve.first().unwrap().price, 1000);
        assert_eq!(curve.last().unwrap().price, 100);
    }

    #[test]
    fn test_missing_parameters() {
        let no_token = CreateAuctionBuilder::new(SALE_RECORD)
            .prices(1000, 100)
            .window(10, 1010)
            .decay(100, 90)
            .bid_bounds(1, 0);
        assert_eq!(
            no_token.build(),
            Err(ClientError::MissingParameter("payment token"))
        );

        assert_eq!(
            builder().window(0, 1000).build(),
            Err(ClientError::MissingParameter("start block"))
        );
        assert_eq!(
            builder().bid_bounds(0, 0).build(),
            Err(ClientError::MissingParameter("minimum bid amount"))
        );
        assert_eq!(
            builder().prices(1000, 0).build(),
            Err(ClientError::MissingParameter("floor price"))
        );
    }

    #[test]
    fn test_invalid_schedule() {
        assert_eq!(
            builder().prices(100, 100).build(),
            Err(ClientError::InvalidAuction(
                ConfigViolation::StartPriceNotAboveFloor {
                    start: 100,
                    floor: 100
                }
            ))
        );
        assert!(matches!(
            builder().window(500, 500).build(),
            Err(ClientError::InvalidAuction(ConfigViolation::EmptyWindow { .. }))
        ));
        assert_eq!(
            builder().decay(0, 90).build(),
            Err(ClientError::InvalidAuction(ConfigViolation::ZeroDecayInterval))
        );
        assert!(matches!(
            builder().bid_bounds(10, 5).build(),
            Err(ClientError::InvalidAuction(ConfigViolation::BidBoundsInverted { .. }))
        ));
    }

    #[test]
    fn test_malformed_sale_record() {
        let result = CreateAuctionBuilder::new("{ owner: aleo1x }")
            .payment_token("4field")
            .prices(1000, 100)
            .window(10, 1010)
            .decay(100, 90)
            .bid_bounds(1, 0)
            .build();
        assert!(matches!(result, Err(ClientError::Record(_))));
    }
}
