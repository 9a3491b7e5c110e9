//! Linear step-decay price schedule.
//!
//! The price starts at `start_price`, drops by `price_decay_amount` every
//! `price_decay_blocks` blocks after `start_block`, and never goes below
//! `floor_price`. At and after `end_block` the price is the floor.

use fairdrop_types::{AuctionConfig, BlockHeight};
use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::validation::validate_schedule;

/// Upper bound on the number of regular samples in a price curve.
pub const MAX_CURVE_SAMPLES: u32 = 200;

/// Validated decay parameters of an auction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecaySchedule {
    start_price: u128,
    floor_price: u128,
    start_block: BlockHeight,
    end_block: BlockHeight,
    decay_blocks: u32,
    decay_amount: u128,
}

impl DecaySchedule {
    /// Build a schedule, refusing configurations that violate the decay
    /// preconditions.
    pub fn new(config: &AuctionConfig) -> Result<Self, PricingError> {
        validate_schedule(config)?;

        Ok(Self {
            start_price: config.start_price,
            floor_price: config.floor_price,
            start_block: config.start_block,
            end_block: config.end_block,
            decay_blocks: config.price_decay_blocks,
            decay_amount: config.price_decay_amount,
        })
    }

    pub fn start_price(&self) -> u128 {
        self.start_price
    }

    pub fn floor_price(&self) -> u128 {
        self.floor_price
    }

    /// Price at `block`, always within `[floor_price, start_price]`.
    pub fn price_at(&self, block: BlockHeight) -> u128 {
        if block < self.start_block {
            return self.start_price;
        }
        if block >= self.end_block {
            return self.floor_price;
        }

        let elapsed = block - self.start_block;
        let steps = u128::from(elapsed / self.decay_blocks);
        // Saturation only happens far past the floor.
        let decay = steps.saturating_mul(self.decay_amount);
        let range = self.start_price - self.floor_price;

        if decay < range {
            self.start_price - decay
        } else {
            self.floor_price
        }
    }

    /// Sampled curve over `[start_block, end_block]` for charting.
    pub fn curve(&self) -> PriceCurve {
        let total = self.end_block - self.start_block;
        let samples = total.min(MAX_CURVE_SAMPLES);
        let stride = (total / samples).max(1);

        PriceCurve {
            schedule: *self,
            stride,
            next: Some(self.start_block),
            last: None,
            finished: false,
        }
    }
}

/// Price at a given block height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub block: BlockHeight,
    pub price: u128,
}

/// Lazy sequence of curve samples.
///
/// Emits every `stride`-th block from `start_block` up to `end_block`, then
/// `(end_block, floor_price)` if the stride stepped over the end. Clone it to
/// iterate again.
#[derive(Clone, Debug)]
pub struct PriceCurve {
    schedule: DecaySchedule,
    stride: u32,
    next: Option<BlockHeight>,
    last: Option<BlockHeight>,
    finished: bool,
}

impl Iterator for PriceCurve {
    type Item = PricePoint;

    fn next(&mut self) -> Option<PricePoint> {
        if let Some(block) = self.next {
            let end = self.schedule.end_block;
            self.next = block.checked_add(self.stride).filter(|b| *b <= end);
            self.last = Some(block);
            return Some(PricePoint {
                block,
                price: self.schedule.price_at(block),
            });
        }

        if self.finished {
            return None;
        }
        self.finished = true;

        let end = self.schedule.end_block;
        (self.last != Some(end)).then_some(PricePoint {
            block: end,
            price: self.schedule.floor_price,
        })
    }
}

/// Current price of an auction at `current_block`.
pub fn current_price(config: &AuctionConfig, current_block: BlockHeight) -> Result<u128, PricingError> {
    Ok(DecaySchedule::new(config)?.price_at(current_block))
}

/// Sampled price curve of an auction.
pub fn price_curve(config: &AuctionConfig) -> Result<PriceCurve, PricingError> {
    Ok(DecaySchedule::new(config)?.curve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigViolation;
    use rand::Rng;

    fn config(start_price: u128, floor_price: u128, start_block: u32, end_block: u32) -> AuctionConfig {
        AuctionConfig {
            auction_id: "1field".into(),
            creator: "aleo1creator".into(),
            sale_token_id: "1field".into(),
            payment_token_id: "4field".into(),
            supply: 1000,
            start_price,
            floor_price,
            start_block,
            end_block,
            price_decay_blocks: 100,
            price_decay_amount: 90,
            max_bid_amount: 0,
            min_bid_amount: 1,
        }
    }

    #[test]
    fn test_step_quantization() {
        let config = config(1000, 100, 0, 1000);

        assert_eq!(current_price(&config, 0).unwrap(), 1000);
        assert_eq!(current_price(&config, 99).unwrap(), 1000);
        assert_eq!(current_price(&config, 100).unwrap(), 910);
        assert_eq!(current_price(&config, 250).unwrap(), 820);
        assert_eq!(current_price(&config, 1000).unwrap(), 100);
    }

    #[test]
    fn test_boundary_values() {
        let config = config(1000, 100, 500, 1500);

        assert_eq!(current_price(&config, 500).unwrap(), 1000);
        assert_eq!(current_price(&config, 499).unwrap(), 1000);
        assert_eq!(current_price(&config, 0).unwrap(), 1000);
        assert_eq!(current_price(&config, 1500).unwrap(), 100);
        assert_eq!(current_price(&config, 1501).unwrap(), 100);
        assert_eq!(current_price(&config, u32::MAX).unwrap(), 100);
    }

    #[test]
    fn test_decay_reaches_floor_before_end() {
        // 10 steps of 90 would pass the floor; clamp at 100 from step 10 on.
        let config = config(1000, 100, 0, 5000);

        assert_eq!(current_price(&config, 900).unwrap(), 190);
        assert_eq!(current_price(&config, 1000).unwrap(), 100);
        assert_eq!(current_price(&config, 4999).unwrap(), 100);
    }

    #[test]
    fn test_huge_decay_saturates_to_floor() {
        let mut config = config(u128::MAX, 1, 0, u32::MAX);
        config.price_decay_blocks = 1;
        config.price_decay_amount = u128::MAX / 2;

        assert_eq!(current_price(&config, 1).unwrap(), u128::MAX - u128::MAX / 2);
        assert_eq!(current_price(&config, 3).unwrap(), 1);
    }

    #[test]
    fn test_monotonic_random_configs() {
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let floor = rng.gen_range(0..1_000_000u128);
            let start_price = floor + rng.gen_range(1..1_000_000u128);
            let start_block = rng.gen_range(0..10_000u32);
            let end_block = start_block + rng.gen_range(1..5_000u32);

            let mut config = config(start_price, floor, start_block, end_block);
            config.price_decay_blocks = rng.gen_range(1..500u32);
            config.price_decay_amount = rng.gen_range(1..50_000u128);

            let schedule = DecaySchedule::new(&config).unwrap();
            let mut previous = schedule.price_at(start_block);
            assert_eq!(previous, start_price);

            for block in start_block..=end_block {
                let price = schedule.price_at(block);
                assert!(price <= previous, "price rose at block {block}");
                assert!(price >= floor && price <= start_price);
                previous = price;
            }
            assert_eq!(previous, floor);
        }
    }

    #[test]
    fn test_curve_small_window_hits_every_block() {
        let config = config(1000, 100, 0, 10);
        let points: Vec<_> = price_curve(&config).unwrap().collect();

        assert_eq!(points.len(), 11);
        assert_eq!(points[0], PricePoint { block: 0, price: 1000 });
        assert_eq!(points[10], PricePoint { block: 10, price: 100 });
    }

    #[test]
    fn test_curve_appends_end_when_stride_skips_it() {
        // 1001 blocks -> stride 5, last regular sample at 1000.
        let config = config(1000, 100, 0, 1001);
        let points: Vec<_> = price_curve(&config).unwrap().collect();

        let last = points.last().unwrap();
        assert_eq!(*last, PricePoint { block: 1001, price: 100 });
        assert_eq!(points[points.len() - 2].block, 1000);
        assert!(points.len() <= MAX_CURVE_SAMPLES as usize + 2);
    }

    #[test]
    fn test_curve_does_not_duplicate_end() {
        let config = config(1000, 100, 0, 1000);
        let points: Vec<_> = price_curve(&config).unwrap().collect();

        assert_eq!(points.len(), 201);
        assert_eq!(points.iter().filter(|p| p.block == 1000).count(), 1);
    }

    #[test]
    fn test_curve_near_block_limit() {
        let config = config(1000, 100, u32::MAX - 7, u32::MAX);
        let points: Vec<_> = price_curve(&config).unwrap().collect();

        assert_eq!(points.len(), 8);
        assert_eq!(points.last().unwrap().block, u32::MAX);
    }

    #[test]
    fn test_curve_is_restartable() {
        let config = config(1000, 100, 0, 777);
        let curve = price_curve(&config).unwrap();

        let first: Vec<_> = curve.clone().collect();
        let second: Vec<_> = curve.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inverted = config(100, 100, 0, 1000);
        assert!(matches!(
            current_price(&inverted, 10),
            Err(PricingError::InvalidConfig(ConfigViolation::StartPriceNotAboveFloor { .. }))
        ));

        let empty = config(1000, 100, 1000, 1000);
        assert!(matches!(
            price_curve(&empty),
            Err(PricingError::InvalidConfig(ConfigViolation::EmptyWindow { .. }))
        ));

        let mut no_interval = config(1000, 100, 0, 1000);
        no_interval.price_decay_blocks = 0;
        assert!(matches!(
            current_price(&no_interval, 10),
            Err(PricingError::InvalidConfig(ConfigViolation::ZeroDecayInterval))
        ));
    }
}
