//! Token record management: minting, joining and splitting.

use tracing::debug;

use fairdrop_types::plaintext::{parse_token_record, u128_literal};

use crate::error::ClientError;
use crate::transition::TransitionCall;

/// Prepare a `create_token` call minting `amount` of `token_id` to `recipient`.
///
/// A bare numeric `token_id` gets its `field` suffix added.
pub fn mint_call(
    recipient: &str,
    token_id: &str,
    amount: u128,
) -> Result<TransitionCall, ClientError> {
    let recipient = recipient.trim();
    let token_id = token_id.trim();
    if recipient.is_empty() {
        return Err(ClientError::MissingParameter("recipient"));
    }
    if token_id.is_empty() {
        return Err(ClientError::MissingParameter("token id"));
    }
    if amount == 0 {
        return Err(ClientError::MissingParameter("mint amount"));
    }

    let token_id = if token_id.contains("field") {
        token_id.to_string()
    } else {
        format!("{token_id}field")
    };

    debug!(%recipient, %token_id, amount, "Prepared mint");
    Ok(TransitionCall::new(
        "create_token",
        vec![recipient.to_string(), token_id, u128_literal(amount)],
    ))
}

/// Prepare a `join_tokens` call merging two records of the same token.
pub fn join_call(first: &str, second: &str) -> Result<TransitionCall, ClientError> {
    let a = parse_token_record(first)?;
    let b = parse_token_record(second)?;
    if a.token_id != b.token_id {
        return Err(ClientError::TokenMismatch {
            first: a.token_id,
            second: b.token_id,
        });
    }

    debug!(
        token_id = %a.token_id,
        total = a.amount.saturating_add(b.amount),
        "Prepared join"
    );
    Ok(TransitionCall::new(
        "join_tokens",
        vec![first.to_string(), second.to_string()],
    ))
}

/// Prepare a `split_token` call carving `amount` out of `record`.
///
/// Both halves must be non-empty, so `amount` is strictly between zero and
/// the record's balance.
pub fn split_call(record: &str, amount: u128) -> Result<TransitionCall, ClientError> {
    let token = parse_token_record(record)?;
    if amount == 0 || amount >= token.amount {
        return Err(ClientError::InvalidSplit {
            amount,
            available: token.amount,
        });
    }

    debug!(
        token_id = %token.token_id,
        amount,
        remainder = token.amount - amount,
        "Prepared split"
    );
    Ok(TransitionCall::new(
        "split_token",
        vec![record.to_string(), u128_literal(amount)],
    ))
}
