//! Mapping access seam.
//!
//! The program's public state lives in key-value mappings read over RPC.
//! [`MappingReader`] abstracts that client; [`InMemoryMappings`] backs tests
//! and offline snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Mapping names of the deployed program.
pub mod names {
    pub const AUCTION_CONFIGS: &str = "auction_configs";
    pub const AUCTION_STATES: &str = "auction_states";
    pub const STATS: &str = "stats";
    pub const AUCTION_INDEX: &str = "auction_index";
    pub const ESCROW_SALES: &str = "escrow_sales";
    pub const ESCROW_PAYMENTS: &str = "escrow_payments";
    pub const CREATOR_WITHDRAWN: &str = "creator_withdrawn";
    pub const UNSOLD_WITHDRAWN: &str = "unsold_withdrawn";
    pub const CREATOR_AUCTION_COUNT: &str = "creator_auction_count";
    pub const CREATOR_LATEST_AUCTION: &str = "creator_latest_auction";
    pub const AUCTION_PREV_BY_CREATOR: &str = "auction_prev_by_creator";

    /// Key of the singleton `stats` entry.
    pub const STATS_KEY: &str = "0field";
}

/// Read access to program mappings.
///
/// In production this wraps the network RPC client.
pub trait MappingReader {
    /// Raw plaintext stored under `key`, or `None` when absent.
    fn get_mapping_value(&self, mapping: &str, key: &str) -> Result<Option<String>, RegistryError>;
}

impl<R: MappingReader + ?Sized> MappingReader for &R {
    fn get_mapping_value(&self, mapping: &str, key: &str) -> Result<Option<String>, RegistryError> {
        (**self).get_mapping_value(mapping, key)
    }
}

/// Mapping contents held in memory: `mapping -> key -> value`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryMappings {
    mappings: BTreeMap<String, BTreeMap<String, String>>,
}

impl InMemoryMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON snapshot of the form `{ "mapping": { "key": "value" } }`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set `mapping[key] = value`.
    pub fn insert(
        &mut self,
        mapping: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.mappings
            .entry(mapping.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Remove `mapping[key]`.
    pub fn remove(&mut self, mapping: &str, key: &str) -> Option<String> {
        self.mappings.get_mut(mapping)?.remove(key)
    }

    /// Number of entries in `mapping`.
    pub fn len(&self, mapping: &str) -> usize {
        self.mappings.get(mapping).map_or(0, BTreeMap::len)
    }
}

impl MappingReader for InMemoryMappings {
    fn get_mapping_value(&self, mapping: &str, key: &str) -> Result<Option<String>, RegistryError> {
        Ok(self
            .mappings
            .get(mapping)
            .and_then(|entries| entries.get(key))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_lookup() {
        let mut mappings = InMemoryMappings::new();
        mappings.insert(names::STATS, names::STATS_KEY, "{ total_auctions: 1u64, total_bids: 0u64 }");

        let value = mappings.get_mapping_value(names::STATS, "0field").unwrap();
        assert!(value.unwrap().contains("total_auctions"));
        assert_eq!(mappings.get_mapping_value(names::STATS, "1field").unwrap(), None);
        assert_eq!(mappings.get_mapping_value("missing", "0field").unwrap(), None);
    }

    #[test]
    fn test_snapshot_json() {
        let json = r#"{ "auction_index": { "0u64": "7field", "1u64": "9field" } }"#;
        let mappings = InMemoryMappings::from_json(json).unwrap();

        assert_eq!(mappings.len(names::AUCTION_INDEX), 2);
        assert_eq!(
            mappings.get_mapping_value(names::AUCTION_INDEX, "1u64").unwrap(),
            Some("9field".into())
        );
    }

    #[test]
    fn test_remove() {
        let mut mappings = InMemoryMappings::new();
        mappings.insert("m", "k", "v");
        assert_eq!(mappings.remove("m", "k"), Some("v".into()));
        assert_eq!(mappings.remove("m", "k"), None);
        assert_eq!(mappings.len("m"), 0);
    }
}
