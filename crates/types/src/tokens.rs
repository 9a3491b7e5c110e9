//! Display names for the well-known test tokens.
//!
//! Sale tokens use ids `1field`..`3field` and payment tokens `4field`..`6field`.
//! Unknown ids display as the raw field literal.

/// A token with a known display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnownToken {
    pub token_id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

const fn token(token_id: &'static str, name: &'static str, symbol: &'static str) -> KnownToken {
    KnownToken { token_id, name, symbol }
}

/// Tokens creators put up for sale.
pub const SALE_TOKENS: [KnownToken; 3] = [
    token("1field", "Alpha Token", "ALPHA"),
    token("2field", "Beta Token", "BETA"),
    token("3field", "Gamma Token", "GAMMA"),
];

/// Tokens bidders pay with.
pub const PAYMENT_TOKENS: [KnownToken; 3] = [
    token("4field", "USD Coin", "USDC"),
    token("5field", "Test Bitcoin", "tBTC"),
    token("6field", "Test Ether", "tETH"),
];

/// Look up a known token by id.
pub fn known_token(token_id: &str) -> Option<&'static KnownToken> {
    SALE_TOKENS
        .iter()
        .chain(PAYMENT_TOKENS.iter())
        .find(|t| t.token_id == token_id)
}

/// `"Name (SYMBOL)"` for known tokens, otherwise the raw id.
pub fn token_label(token_id: &str) -> String {
    match known_token(token_id) {
        Some(t) => format!("{} ({})", t.name, t.symbol),
        None => token_id.to_string(),
    }
}

/// The symbol for known tokens, otherwise the raw id.
pub fn token_symbol(token_id: &str) -> &str {
    known_token(token_id).map_or(token_id, |t| t.symbol)
}
