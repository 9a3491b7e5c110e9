//! Program transition calls.

use serde::{Deserialize, Serialize};

use fairdrop_registry::{RegistryConfig, DEFAULT_FEE, DEFAULT_PROGRAM_ID};

/// A transition ready to hand to a wallet for signing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCall {
    pub program_id: String,
    pub function: String,
    /// Inputs as Leo literals, in parameter order
    pub inputs: Vec<String>,
    /// Fee in microcredits
    pub fee: u64,
}

impl TransitionCall {
    /// Call `function` on the default program with the default fee.
    pub fn new(function: &str, inputs: Vec<String>) -> Self {
        Self {
            program_id: DEFAULT_PROGRAM_ID.to_string(),
            function: function.to_string(),
            inputs,
            fee: DEFAULT_FEE,
        }
    }

    /// Target the program and fee of `config`.
    pub fn with_registry_config(mut self, config: &RegistryConfig) -> Self {
        self.program_id = config.program_id.clone();
        self.fee = config.fee;
        self
    }

    pub fn label(&self) -> &str {
        transition_label(&self.function)
    }
}

/// Human-readable label of a program function, or the name itself when
/// unknown.
pub fn transition_label(function: &str) -> &str {
    match function {
        "create_token" | "mint_public" => "Mint Tokens",
        "create_auction" => "Create Auction",
        "place_bid" => "Place Bid",
        "claim" => "Claim Tokens",
        "close_auction" => "Close Auction",
        "clear_auction" => "Clear Auction",
        "withdraw_payments" => "Withdraw Payments",
        "withdraw_unsold" => "Withdraw Unsold",
        "join_tokens" => "Join Records",
        "split_token" => "Split Record",
        "transfer_public" => "Transfer Tokens",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(transition_label("place_bid"), "Place Bid");
        assert_eq!(transition_label("mint_public"), "Mint Tokens");
        assert_eq!(transition_label("clear_auction"), "Clear Auction");
        assert_eq!(transition_label("unknown_fn"), "unknown_fn");
    }

    #[test]
    fn test_registry_config_overrides() {
        let config = RegistryConfig {
            program_id: "fairdrop_v2.aleo".into(),
            fee: 250_000,
            ..Default::default()
        };
        let call = TransitionCall::new("claim", vec![]).with_registry_config(&config);

        assert_eq!(call.program_id, "fairdrop_v2.aleo");
        assert_eq!(call.fee, 250_000);
        assert_eq!(call.label(), "Claim Tokens");
    }

    #[test]
    fn test_defaults() {
        let call = TransitionCall::new("close_auction", vec!["1field".into()]);
        assert_eq!(call.program_id, "fairdrop.aleo");
        assert_eq!(call.fee, 100_000);
    }
}
