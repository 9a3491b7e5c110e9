//! Creator operations: closing an auction and withdrawing from escrow.
//!
//! Revenue and unsold tokens only become withdrawable once the auction is
//! cleared. The amounts already withdrawn are tracked on chain in
//! `creator_withdrawn` and `unsold_withdrawn`.

use fairdrop_pricing::auction_status;
use fairdrop_registry::EscrowBalances;
use fairdrop_types::plaintext::u128_literal;
use fairdrop_types::{AuctionConfig, AuctionState, AuctionStatus, BlockHeight};

use crate::error::ClientError;
use crate::transition::TransitionCall;

/// Prepare a `close_auction` call.
///
/// Only a sold-out or elapsed auction that is not yet cleared can be closed.
pub fn close_auction_call(
    config: &AuctionConfig,
    state: &AuctionState,
    current_block: BlockHeight,
) -> Result<TransitionCall, ClientError> {
    match auction_status(config, state, current_block) {
        AuctionStatus::SupplyMet | AuctionStatus::Ended => Ok(TransitionCall::new(
            "close_auction",
            vec![config.auction_id.clone()],
        )),
        status => Err(ClientError::CannotClose(status)),
    }
}

/// Payment revenue the creator can still withdraw.
pub fn withdrawable_revenue(state: &AuctionState, escrow: &EscrowBalances) -> u128 {
    if !state.cleared {
        return 0;
    }
    state.creator_revenue.saturating_sub(escrow.creator_withdrawn)
}

/// Unsold sale tokens the creator can still recover.
pub fn withdrawable_unsold(
    config: &AuctionConfig,
    state: &AuctionState,
    escrow: &EscrowBalances,
) -> u128 {
    if !state.cleared {
        return 0;
    }
    config
        .supply
        .saturating_sub(state.total_committed)
        .saturating_sub(escrow.unsold_withdrawn)
}

/// Prepare a `withdraw_payments` call for `amount` of revenue.
pub fn withdraw_payments_call(
    config: &AuctionConfig,
    state: &AuctionState,
    escrow: &EscrowBalances,
    amount: u128,
) -> Result<TransitionCall, ClientError> {
    check_withdrawal(config, state, amount, withdrawable_revenue(state, escrow))?;
    Ok(TransitionCall::new(
        "withdraw_payments",
        vec![
            config.auction_id.clone(),
            u128_literal(amount),
            config.payment_token_id.clone(),
        ],
    ))
}

/// Prepare a `withdraw_unsold` call for `amount` sale tokens.
pub fn withdraw_unsold_call(
    config: &AuctionConfig,
    state: &AuctionState,
    escrow: &EscrowBalances,
    amount: u128,
) -> Result<TransitionCall, ClientError> {
    check_withdrawal(config, state, amount, withdrawable_unsold(config, state, escrow))?;
    Ok(TransitionCall::new(
        "withdraw_unsold",
        vec![
            config.auction_id.clone(),
            u128_literal(amount),
            config.sale_token_id.clone(),
        ],
    ))
}

fn check_withdrawal(
    config: &AuctionConfig,
    state: &AuctionState,
    amount: u128,
    available: u128,
) -> Result<(), ClientError> {
    if !state.cleared {
        return Err(ClientError::NotCleared(config.auction_id.clone()));
    }
    if amount == 0 {
        return Err(ClientError::MissingParameter("withdrawal amount"));
    }
    if amount > available {
        return Err(ClientError::WithdrawalExceeds {
            requested: amount,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuctionConfig {
        AuctionConfig {
            auction_id: "7field".into(),
            creator: "aleo1creator".into(),
            sale_token_id: "1field".into(),
            payment_token_id: "4field".into(),
            supply: 1000,
            start_price: 1000,
            floor_price: 100,
            start_block: 0,
            end_block: 1000,
            price_decay_blocks: 100,
            price_decay_amount: 90,
            max_bid_amount: 0,
            min_bid_amount: 1,
        }
    }

    fn cleared() -> AuctionState {
        AuctionState {
            total_committed: 600,
            total_payments: 500_000,
            cleared: true,
            clearing_price: 700,
            creator_revenue: 420_000,
            ended_at_block: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn test_close_auction() {
        let config = config();
        let open = AuctionState::default();

        assert_eq!(
            close_auction_call(&config, &open, 500),
            Err(ClientError::CannotClose(AuctionStatus::Active))
        );

        let call = close_auction_call(&config, &open, 1000).unwrap();
        assert_eq!(call.function, "close_auction");
        assert_eq!(call.inputs, vec!["7field".to_string()]);

        let sold_out = AuctionState {
            supply_met: true,
            ..Default::default()
        };
        assert!(close_auction_call(&config, &sold_out, 500).is_ok());

        assert_eq!(
            close_auction_call(&config, &cleared(), 1200),
            Err(ClientError::CannotClose(AuctionStatus::Cleared))
        );
    }

    #[test]
    fn test_withdrawable_amounts() {
        let config = config();
        let escrow = EscrowBalances {
            creator_withdrawn: 20_000,
            unsold_withdrawn: 100,
            ..Default::default()
        };

        assert_eq!(withdrawable_revenue(&cleared(), &escrow), 400_000);
        assert_eq!(withdrawable_unsold(&config, &cleared(), &escrow), 300);

        let open = AuctionState {
            creator_revenue: 10,
            ..Default::default()
        };
        assert_eq!(withdrawable_revenue(&open, &escrow), 0);
        assert_eq!(withdrawable_unsold(&config, &open, &escrow), 0);
    }

    #[test]
    fn test_withdraw_calls() {
        let config = config();
        let escrow = EscrowBalances::default();

        let call = withdraw_payments_call(&config, &cleared(), &escrow, 420_000).unwrap();
        assert_eq!(call.inputs, vec!["7field", "420000u128", "4field"]);

        let call = withdraw_unsold_call(&config, &cleared(), &escrow, 400).unwrap();
        assert_eq!(call.inputs, vec!["7field", "400u128", "1field"]);
    }

    #[test]
    fn test_withdraw_limits() {
        let config = config();
        let escrow = EscrowBalances::default();

        assert_eq!(
            withdraw_unsold_call(&config, &cleared(), &escrow, 401),
            Err(ClientError::WithdrawalExceeds {
                requested: 401,
                available: 400
            })
        );
        assert_eq!(
            withdraw_payments_call(&config, &cleared(), &escrow, 0),
            Err(ClientError::MissingParameter("withdrawal amount"))
        );
        assert_eq!(
            withdraw_payments_call(&config, &AuctionState::default(), &escrow, 1),
            Err(ClientError::NotCleared("7field".into()))
        );
    }
}
