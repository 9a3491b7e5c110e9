//! Auction lifecycle status.

use fairdrop_types::{AuctionConfig, AuctionState, AuctionStatus, BlockHeight};

/// Phase implied by block height alone.
///
/// The last tenth of the window reports `Ending`. The comparison is done in
/// integers: `remaining * 10 < total`, so exactly 10% remaining is still
/// `Active`.
pub fn block_phase(config: &AuctionConfig, current_block: BlockHeight) -> AuctionStatus {
    if current_block < config.start_block {
        return AuctionStatus::Upcoming;
    }
    if current_block >= config.end_block {
        return AuctionStatus::Ended;
    }

    let total = u64::from(config.end_block - config.start_block);
    let remaining = u64::from(config.end_block - current_block);
    if remaining * 10 < total {
        AuctionStatus::Ending
    } else {
        AuctionStatus::Active
    }
}

/// Status of an auction at `current_block`.
///
/// On-chain flags win over block height: a cleared auction is `Cleared` and
/// a sold-out one `SupplyMet`, whatever the block.
pub fn auction_status(
    config: &AuctionConfig,
    state: &AuctionState,
    current_block: BlockHeight,
) -> AuctionStatus {
    if state.cleared {
        AuctionStatus::Cleared
    } else if state.supply_met {
        AuctionStatus::SupplyMet
    } else {
        block_phase(config, current_block)
    }
}

/// Share of the bidding window elapsed, in whole percent. Zero outside the
/// window.
pub fn time_percent(config: &AuctionConfig, current_block: BlockHeight) -> u8 {
    if current_block < config.start_block || current_block >= config.end_block {
        return 0;
    }

    let total = u64::from(config.end_block - config.start_block);
    let elapsed = u64::from(current_block - config.start_block);
    // elapsed < total, so this is below 100
    u8::try_from(elapsed * 100 / total).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start_block: u32, end_block: u32) -> AuctionConfig {
        AuctionConfig {
            auction_id: "1field".into(),
            creator: "aleo1creator".into(),
            sale_token_id: "1field".into(),
            payment_token_id: "4field".into(),
            supply: 1000,
            start_price: 1000,
            floor_price: 100,
            start_block,
            end_block,
            price_decay_blocks: 100,
            price_decay_amount: 90,
            max_bid_amount: 0,
            min_bid_amount: 1,
        }
    }

    #[test]
    fn test_block_phases() {
        let config = config(100, 1100);
        assert_eq!(block_phase(&config, 0), AuctionStatus::Upcoming);
        assert_eq!(block_phase(&config, 99), AuctionStatus::Upcoming);
        assert_eq!(block_phase(&config, 100), AuctionStatus::Active);
        assert_eq!(block_phase(&config, 1100), AuctionStatus::Ended);
        assert_eq!(block_phase(&config, 5000), AuctionStatus::Ended);
    }

    #[test]
    fn test_ending_threshold() {
        let config = config(0, 1000);
        let state = AuctionState::default();

        assert_eq!(auction_status(&config, &state, 899), AuctionStatus::Active);
        assert_eq!(auction_status(&config, &state, 900), AuctionStatus::Active);
        for block in 901..1000 {
            assert_eq!(auction_status(&config, &state, block), AuctionStatus::Ending);
        }
        assert_eq!(auction_status(&config, &state, 1000), AuctionStatus::Ended);
    }

    #[test]
    fn test_ending_threshold_small_window() {
        // 30-block window: ending only once fewer than 3 blocks remain.
        let config = config(0, 30);
        assert_eq!(block_phase(&config, 27), AuctionStatus::Active);
        assert_eq!(block_phase(&config, 28), AuctionStatus::Ending);
    }

    #[test]
    fn test_cleared_overrides_block_height() {
        let config = config(100, 1100);
        let state = AuctionState {
            cleared: true,
            supply_met: true,
            ..Default::default()
        };

        assert_eq!(auction_status(&config, &state, 0), AuctionStatus::Cleared);
        assert_eq!(auction_status(&config, &state, 500), AuctionStatus::Cleared);
        assert_eq!(auction_status(&config, &state, 9000), AuctionStatus::Cleared);
    }

    #[test]
    fn test_supply_met_overrides_block_height() {
        let config = config(100, 1100);
        let state = AuctionState {
            supply_met: true,
            ended_at_block: 400,
            ..Default::default()
        };

        assert_eq!(auction_status(&config, &state, 500), AuctionStatus::SupplyMet);
        assert_eq!(auction_status(&config, &state, 2000), AuctionStatus::SupplyMet);
    }

    #[test]
    fn test_time_percent() {
        let config = config(100, 300);
        assert_eq!(time_percent(&config, 50), 0);
        assert_eq!(time_percent(&config, 100), 0);
        assert_eq!(time_percent(&config, 150), 25);
        assert_eq!(time_percent(&config, 299), 99);
        assert_eq!(time_percent(&config, 300), 0);
    }
}
