//! Plaintext decoding errors.

use thiserror::Error;

/// Errors raised while decoding the chain's textual struct representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid {expected} literal: {got:?}")]
    InvalidLiteral { expected: &'static str, got: String },

    #[error("Invalid boolean literal: {0:?}")]
    InvalidBool(String),
}
