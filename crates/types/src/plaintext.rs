//! Codec for the chain's textual struct representation.
//!
//! Mapping values and decrypted records arrive as plaintext structs:
//!
//! ```text
//! {
//!   auction_id: 42field,
//!   supply: 1000u128,
//!   start_block: 120u32,
//!   cleared: false
//! }
//! ```
//!
//! Values carry a type suffix which is stripped before the digits are parsed
//! at the stated width. Record fields may also carry a `.private`/`.public`
//! visibility qualifier. A missing field is an error, never a default.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::{AuctionConfig, AuctionState, BidRecord, ParseError, Stats, TokenRecord};

const VISIBILITY_QUALIFIERS: [&str; 2] = [".private", ".public"];

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Extract the raw value of `name: value` from a plaintext struct.
///
/// `name` must match a whole identifier, so `supply` never matches
/// `supply_met`. The value runs up to the next `,`, `}` or whitespace.
pub fn extract_field<'a>(text: &'a str, name: &str) -> Result<&'a str, ParseError> {
    if name.is_empty() {
        return Err(ParseError::MissingField(String::new()));
    }

    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(name) {
        let start = cursor + offset;
        let end = start + name.len();
        cursor = end;

        let at_boundary = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_ident_char(c));
        let rest = text[end..].trim_start();
        if !at_boundary || !rest.starts_with(':') {
            continue;
        }

        let value = rest[1..].trim_start();
        let len = value
            .find(|c: char| c == ',' || c == '}' || c.is_whitespace())
            .unwrap_or(value.len());
        let value = strip_visibility(&value[..len]);
        if value.is_empty() {
            break;
        }
        return Ok(value);
    }

    Err(ParseError::MissingField(name.to_string()))
}

fn strip_visibility(value: &str) -> &str {
    VISIBILITY_QUALIFIERS
        .iter()
        .find_map(|q| value.strip_suffix(q))
        .unwrap_or(value)
}

fn parse_suffixed<T: FromStr>(value: &str, suffix: &'static str) -> Result<T, ParseError> {
    let invalid = || ParseError::InvalidLiteral {
        expected: suffix,
        got: value.to_string(),
    };

    let digits = value
        .trim()
        .strip_suffix(suffix)
        .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(invalid)?;

    digits.parse().map_err(|_| invalid())
}

/// Parse a `123u128` literal.
pub fn parse_u128(value: &str) -> Result<u128, ParseError> {
    parse_suffixed(value, "u128")
}

/// Parse a `123u64` literal.
pub fn parse_u64(value: &str) -> Result<u64, ParseError> {
    parse_suffixed(value, "u64")
}

/// Parse a `123u32` literal.
pub fn parse_u32(value: &str) -> Result<u32, ParseError> {
    parse_suffixed(value, "u32")
}

/// Parse a `true`/`false` literal.
pub fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ParseError::InvalidBool(other.to_string())),
    }
}

fn field_string(text: &str, name: &str) -> Result<String, ParseError> {
    extract_field(text, name).map(str::to_string)
}

fn field_u128(text: &str, name: &str) -> Result<u128, ParseError> {
    extract_field(text, name).and_then(parse_u128)
}

fn field_u64(text: &str, name: &str) -> Result<u64, ParseError> {
    extract_field(text, name).and_then(parse_u64)
}

fn field_u32(text: &str, name: &str) -> Result<u32, ParseError> {
    extract_field(text, name).and_then(parse_u32)
}

fn field_bool(text: &str, name: &str) -> Result<bool, ParseError> {
    extract_field(text, name).and_then(parse_bool)
}

/// Decode an `auction_configs` mapping value.
pub fn parse_auction_config(text: &str) -> Result<AuctionConfig, ParseError> {
    Ok(AuctionConfig {
        auction_id: field_string(text, "auction_id")?,
        creator: field_string(text, "creator")?,
        sale_token_id: field_string(text, "sale_token_id")?,
        payment_token_id: field_string(text, "payment_token_id")?,
        supply: field_u128(text, "supply")?,
        start_price: field_u128(text, "start_price")?,
        floor_price: field_u128(text, "floor_price")?,
        start_block: field_u32(text, "start_block")?,
        end_block: field_u32(text, "end_block")?,
        price_decay_blocks: field_u32(text, "price_decay_blocks")?,
        price_decay_amount: field_u128(text, "price_decay_amount")?,
        max_bid_amount: field_u128(text, "max_bid_amount")?,
        min_bid_amount: field_u128(text, "min_bid_amount")?,
    })
}

/// Decode an `auction_states` mapping value.
pub fn parse_auction_state(text: &str) -> Result<AuctionState, ParseError> {
    Ok(AuctionState {
        total_committed: field_u128(text, "total_committed")?,
        total_payments: field_u128(text, "total_payments")?,
        supply_met: field_bool(text, "supply_met")?,
        ended_at_block: field_u32(text, "ended_at_block")?,
        cleared: field_bool(text, "cleared")?,
        clearing_price: field_u128(text, "clearing_price")?,
        creator_revenue: field_u128(text, "creator_revenue")?,
    })
}

/// Decode the `stats` mapping value.
pub fn parse_stats(text: &str) -> Result<Stats, ParseError> {
    Ok(Stats {
        total_auctions: field_u64(text, "total_auctions")?,
        total_bids: field_u64(text, "total_bids")?,
    })
}

/// Decode a decrypted `Bid` record.
pub fn parse_bid_record(text: &str) -> Result<BidRecord, ParseError> {
    Ok(BidRecord {
        owner: field_string(text, "owner")?,
        auction_id: field_string(text, "auction_id")?,
        quantity: field_u128(text, "quantity")?,
        payment_amount: field_u128(text, "payment_amount")?,
    })
}

/// Decode a decrypted `Token` record.
pub fn parse_token_record(text: &str) -> Result<TokenRecord, ParseError> {
    Ok(TokenRecord {
        owner: field_string(text, "owner")?,
        token_id: field_string(text, "token_id")?,
        amount: field_u128(text, "amount")?,
    })
}

// =========================
// ENCODING
// =========================

pub fn u128_literal(value: u128) -> String {
    format!("{value}u128")
}

pub fn u64_literal(value: u64) -> String {
    format!("{value}u64")
}

pub fn u32_literal(value: u32) -> String {
    format!("{value}u32")
}

fn write_struct(fields: &[(&str, String)]) -> String {
    let mut out = String::from("{\n");
    for (i, (name, value)) in fields.iter().enumerate() {
        let sep = if i + 1 < fields.len() { "," } else { "" };
        let _ = writeln!(out, "  {name}: {value}{sep}");
    }
    out.push('}');
    out
}

impl AuctionConfig {
    /// Encode in the mapping value layout accepted by [`parse_auction_config`].
    pub fn to_plaintext(&self) -> String {
        write_struct(&[
            ("auction_id", self.auction_id.clone()),
            ("creator", self.creator.clone()),
            ("sale_token_id", self.sale_token_id.clone()),
            ("payment_token_id", self.payment_token_id.clone()),
            ("supply", u128_literal(self.supply)),
            ("start_price", u128_literal(self.start_price)),
            ("floor_price", u128_literal(self.floor_price)),
            ("start_block", u32_literal(self.start_block)),
            ("end_block", u32_literal(self.end_block)),
            ("price_decay_blocks", u32_literal(self.price_decay_blocks)),
            ("price_decay_amount", u128_literal(self.price_decay_amount)),
            ("max_bid_amount", u128_literal(self.max_bid_amount)),
            ("min_bid_amount", u128_literal(self.min_bid_amount)),
        ])
    }
}

impl AuctionState {
    /// Encode in the mapping value layout accepted by [`parse_auction_state`].
    pub fn to_plaintext(&self) -> String {
        write_struct(&[
            ("total_committed", u128_literal(self.total_committed)),
            ("total_payments", u128_literal(self.total_payments)),
            ("supply_met", self.supply_met.to_string()),
            ("ended_at_block", u32_literal(self.ended_at_block)),
            ("cleared", self.cleared.to_string()),
            ("clearing_price", u128_literal(self.clearing_price)),
            ("creator_revenue", u128_literal(self.creator_revenue)),
        ])
    }
}

impl Stats {
    pub fn to_plaintext(&self) -> String {
        write_struct(&[
            ("total_auctions", u64_literal(self.total_auctions)),
            ("total_bids", u64_literal(self.total_bids)),
        ])
    }
}

// =========================
// DISPLAY HELPERS
// =========================

/// Shorten a field literal for display: drops the `field` suffix and elides
/// long values as `first8...last6`.
pub fn format_field(field: &str) -> String {
    let value = field.strip_suffix("field").unwrap_or(field);
    if value.len() > 16 && value.is_ascii() {
        format!("{}...{}", &value[..8], &value[value.len() - 6..])
    } else {
        value.to_string()
    }
}

/// Shorten an address to `chars` characters on each side.
pub fn truncate_address(address: &str, chars: usize) -> String {
    if address.len() <= chars * 2 + 3 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..chars], &address[address.len() - chars..])
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a base-unit amount with `decimals` fractional digits, trailing
/// zeros trimmed and thousands grouped.
pub fn format_amount(amount: u128, decimals: u32) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return group_thousands(&digits);
    }

    // at least one whole digit
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let whole = group_thousands(whole);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole
    } else {
        format!("{whole}.{frac}")
    }
}
