//! Read-only queries over the program's mappings.
//!
//! Configs are read cache-first; states are always read fresh because they
//! change until the auction clears.

use std::collections::HashMap;

use fairdrop_pricing::{auction_status, block_phase, current_price, demand_percent};
use fairdrop_types::{
    plaintext, Address, AuctionConfig, AuctionState, AuctionStatus, BlockHeight, Field, Stats,
    NULL_FIELD,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{ConfigCache, CreatorIndexCache};
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::mappings::{names, MappingReader};

/// Result type for registry queries.
pub type QueryResult<T> = Result<T, RegistryError>;

/// An auction's config together with its latest state, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionEntry {
    pub config: AuctionConfig,
    pub state: Option<AuctionState>,
}

impl AuctionEntry {
    /// Status at `block`. Without a state only block height is used.
    pub fn status(&self, block: BlockHeight) -> AuctionStatus {
        match &self.state {
            Some(state) => auction_status(&self.config, state, block),
            None => block_phase(&self.config, block),
        }
    }

    /// Summary for listing at `block`.
    pub fn summary(&self, block: BlockHeight) -> AuctionSummary {
        AuctionSummary::from_entry(self, block)
    }
}

/// Summary of an auction for listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSummary {
    pub auction_id: Field,
    pub creator: Address,
    pub status: AuctionStatus,
    /// `None` when the stored config cannot be priced
    pub current_price: Option<u128>,
    pub demand_percent: u8,
    pub start_block: BlockHeight,
    pub end_block: BlockHeight,
}

impl AuctionSummary {
    /// Create summary from an auction entry.
    pub fn from_entry(entry: &AuctionEntry, block: BlockHeight) -> Self {
        let config = &entry.config;
        Self {
            auction_id: config.auction_id.clone(),
            creator: config.creator.clone(),
            status: entry.status(block),
            current_price: current_price(config, block).ok(),
            demand_percent: entry
                .state
                .as_ref()
                .map_or(0, |state| demand_percent(state, config)),
            start_block: config.start_block,
            end_block: config.end_block,
        }
    }
}

/// Summaries of `entries` at `block`, in the same order.
pub fn summaries(entries: &[AuctionEntry], block: BlockHeight) -> Vec<AuctionSummary> {
    entries.iter().map(|entry| entry.summary(block)).collect()
}

/// Options for [`AuctionRegistry::list_auctions`].
#[derive(Clone, Debug, Default)]
pub struct ListFilter {
    /// Only auctions created by this address
    pub creator: Option<Address>,
    /// Overrides the registry's list limit
    pub limit: Option<usize>,
}

/// Escrow and withdrawal bookkeeping of an auction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowBalances {
    /// Sale tokens held in escrow
    pub sales: u128,
    /// Payments held in escrow
    pub payments: u128,
    /// Revenue already withdrawn by the creator
    pub creator_withdrawn: u128,
    /// Unsold sale tokens already recovered by the creator
    pub unsold_withdrawn: u128,
}

/// Query front-end over a [`MappingReader`].
#[derive(Debug)]
pub struct AuctionRegistry<R> {
    reader: R,
    configs: ConfigCache,
    creators: CreatorIndexCache,
    list_limit: usize,
}

impl<R: MappingReader> AuctionRegistry<R> {
    /// Create a registry with an in-memory config cache.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            configs: ConfigCache::new(),
            creators: CreatorIndexCache::new(),
            list_limit: RegistryConfig::default().list_limit,
        }
    }

    /// Create a registry using the cache directory and limits of `config`.
    pub fn from_config(reader: R, config: &RegistryConfig) -> Self {
        let configs = match &config.cache_dir {
            Some(dir) => ConfigCache::with_file(dir),
            None => ConfigCache::new(),
        };
        Self {
            configs,
            list_limit: config.list_limit,
            ..Self::new(reader)
        }
    }

    /// Replace the config cache.
    pub fn with_config_cache(mut self, cache: ConfigCache) -> Self {
        self.configs = cache;
        self
    }

    pub fn config_cache(&self) -> &ConfigCache {
        &self.configs
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    fn read(&self, mapping: &str, key: &str) -> QueryResult<Option<String>> {
        self.reader.get_mapping_value(mapping, key)
    }

    /// Global counters, `None` before the first auction.
    pub fn stats(&self) -> QueryResult<Option<Stats>> {
        self.read(names::STATS, names::STATS_KEY)?
            .map(|raw| plaintext::parse_stats(&raw))
            .transpose()
            .map_err(Into::into)
    }

    /// Config of `auction_id`, served from cache when possible.
    pub fn auction_config(&self, auction_id: &str) -> QueryResult<Option<AuctionConfig>> {
        if let Some(raw) = self.configs.get(auction_id) {
            debug!(auction_id, "Config cache hit");
            return Ok(Some(plaintext::parse_auction_config(&raw)?));
        }

        let Some(raw) = self.read(names::AUCTION_CONFIGS, auction_id)? else {
            return Ok(None);
        };
        let config = plaintext::parse_auction_config(&raw)?;
        self.configs
            .insert_many(HashMap::from([(auction_id.to_string(), raw)]));
        Ok(Some(config))
    }

    /// Current state of `auction_id`. Never cached.
    pub fn auction_state(&self, auction_id: &str) -> QueryResult<Option<AuctionState>> {
        self.read(names::AUCTION_STATES, auction_id)?
            .map(|raw| plaintext::parse_auction_state(&raw))
            .transpose()
            .map_err(Into::into)
    }

    /// Config and state of `auction_id`.
    pub fn auction(&self, auction_id: &str) -> QueryResult<AuctionEntry> {
        let config = self
            .auction_config(auction_id)?
            .ok_or_else(|| RegistryError::AuctionNotFound(auction_id.to_string()))?;
        let state = self.auction_state(auction_id)?;
        Ok(AuctionEntry { config, state })
    }

    /// Auction id at position `index` of the global creation index.
    pub fn auction_id_at(&self, index: u64) -> QueryResult<Option<Field>> {
        self.read(names::AUCTION_INDEX, &plaintext::u64_literal(index))
    }

    /// Auctions in creation order, newest first.
    ///
    /// Reads `stats` for the auction count, walks `auction_index` downward
    /// and loads each entry. Entries that fail to load are skipped.
    pub fn list_auctions(&self, filter: &ListFilter) -> QueryResult<Vec<AuctionEntry>> {
        let Some(stats) = self.stats()? else {
            return Ok(Vec::new());
        };
        let count = stats.total_auctions;
        let limit = filter.limit.unwrap_or(self.list_limit) as u64;
        let oldest = count.saturating_sub(limit);

        let mut ids = Vec::new();
        for index in (oldest..count).rev() {
            match self.auction_id_at(index) {
                Ok(Some(id)) => ids.push(id),
                Ok(None) => debug!(index, "Auction index slot empty"),
                Err(e) => warn!(index, error = %e, "Skipping unreadable auction index slot"),
            }
        }

        let mut entries = self.load_entries(&ids);
        if let Some(creator) = &filter.creator {
            entries.retain(|entry| &entry.config.creator == creator);
        }
        Ok(entries)
    }

    /// Number of auctions created by `creator`.
    pub fn creator_auction_count(&self, creator: &str) -> QueryResult<u64> {
        match self.read(names::CREATOR_AUCTION_COUNT, creator)? {
            Some(raw) => Ok(plaintext::parse_u64(&raw)?),
            None => Ok(0),
        }
    }

    /// Ids of `creator`'s auctions, newest first.
    ///
    /// Follows `creator_latest_auction` then `auction_prev_by_creator` until
    /// the null field or `count` ids. The walk is skipped while the cached
    /// list still matches the on-chain count.
    pub fn creator_auction_ids(&self, creator: &str) -> QueryResult<Vec<Field>> {
        let count = self.creator_auction_count(creator)?;
        if count == 0 {
            return Ok(Vec::new());
        }
        if let Some(ids) = self.creators.get(creator, count) {
            debug!(creator, count, "Creator index cache hit");
            return Ok(ids);
        }

        let mut ids = Vec::new();
        let mut cursor = self.read(names::CREATOR_LATEST_AUCTION, creator)?;
        while let Some(id) = cursor.filter(|id| id != NULL_FIELD) {
            if ids.len() as u64 >= count {
                break;
            }
            cursor = self.read(names::AUCTION_PREV_BY_CREATOR, &id)?;
            ids.push(id);
        }

        debug!(creator, count, walked = ids.len(), "Walked creator auction list");
        self.creators.store(creator, ids.clone());
        Ok(ids)
    }

    /// `creator`'s auctions, newest first.
    pub fn creator_auctions(&self, creator: &str) -> QueryResult<Vec<AuctionEntry>> {
        let ids = self.creator_auction_ids(creator)?;
        Ok(self.load_entries(&ids))
    }

    /// Escrow and withdrawal amounts of `auction_id`. Absent entries read
    /// as zero.
    pub fn escrow(&self, auction_id: &str) -> QueryResult<EscrowBalances> {
        let amount = |mapping: &str| -> QueryResult<u128> {
            match self.read(mapping, auction_id)? {
                Some(raw) => Ok(plaintext::parse_u128(&raw)?),
                None => Ok(0),
            }
        };

        Ok(EscrowBalances {
            sales: amount(names::ESCROW_SALES)?,
            payments: amount(names::ESCROW_PAYMENTS)?,
            creator_withdrawn: amount(names::CREATOR_WITHDRAWN)?,
            unsold_withdrawn: amount(names::UNSOLD_WITHDRAWN)?,
        })
    }

    /// Summaries of listed auctions that accept bids at `block`.
    pub fn active_auctions(&self, block: BlockHeight) -> QueryResult<Vec<AuctionSummary>> {
        let mut active = summaries(&self.list_auctions(&ListFilter::default())?, block);
        active.retain(|summary| summary.status.accepts_bids());
        Ok(active)
    }

    /// Load configs (cache-first) and fresh states for `ids`, keeping order.
    fn load_entries(&self, ids: &[Field]) -> Vec<AuctionEntry> {
        let partition = self.configs.partition(ids);
        debug!(
            hits = partition.hits.len(),
            misses = partition.misses.len(),
            "Config cache lookup"
        );

        let mut fetched = HashMap::new();
        for id in &partition.misses {
            match self.read(names::AUCTION_CONFIGS, id) {
                // Only well-formed configs are cached.
                Ok(Some(raw)) if plaintext::parse_auction_config(&raw).is_ok() => {
                    fetched.insert(id.clone(), raw);
                }
                Ok(Some(_)) => warn!(auction_id = %id, "Skipping malformed auction config"),
                Ok(None) => debug!(auction_id = %id, "Auction config missing"),
                Err(e) => warn!(auction_id = %id, error = %e, "Skipping unreadable auction config"),
            }
        }

        let mut raws = partition.hits;
        raws.extend(fetched.iter().map(|(id, raw)| (id.clone(), raw.clone())));
        self.configs.insert_many(fetched);

        ids.iter()
            .filter_map(|id| {
                let config = plaintext::parse_auction_config(raws.get(id)?).ok()?;
                match self.auction_state(id) {
                    Ok(state) => Some(AuctionEntry { config, state }),
                    Err(e) => {
                        warn!(auction_id = %id, error = %e, "Skipping auction with unreadable state");
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings::InMemoryMappings;
    use std::cell::{Cell, RefCell};

    /// Counts reads per mapping to observe caching.
    struct CountingReader {
        inner: InMemoryMappings,
        config_reads: Cell<usize>,
        prev_reads: Cell<usize>,
    }

    impl CountingReader {
        fn new(inner: InMemoryMappings) -> Self {
            Self {
                inner,
                config_reads: Cell::new(0),
                prev_reads: Cell::new(0),
            }
        }
    }

    impl MappingReader for CountingReader {
        fn get_mapping_value(&self, mapping: &str, key: &str) -> QueryResult<Option<String>> {
            if mapping == names::AUCTION_CONFIGS {
                self.config_reads.set(self.config_reads.get() + 1);
            }
            if mapping == names::AUCTION_PREV_BY_CREATOR {
                self.prev_reads.set(self.prev_reads.get() + 1);
            }
            self.inner.get_mapping_value(mapping, key)
        }
    }

    fn config(id: &str, creator: &str) -> AuctionConfig {
        AuctionConfig {
            auction_id: id.into(),
            creator: creator.into(),
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

    /// Three auctions indexed 0..3; the first two by alice.
    fn chain() -> InMemoryMappings {
        let mut m = InMemoryMappings::new();
        let auctions = [("11field", "aleo1alice"), ("12field", "aleo1alice"), ("13field", "aleo1bob")];
        for (index, (id, creator)) in auctions.iter().enumerate() {
            m.insert(names::AUCTION_INDEX, format!("{index}u64"), *id);
            m.insert(names::AUCTION_CONFIGS, *id, config(id, creator).to_plaintext());
            m.insert(
                names::AUCTION_STATES,
                *id,
                AuctionState {
                    total_committed: 250,
                    ..Default::default()
                }
                .to_plaintext(),
            );
        }
        m.insert(
            names::STATS,
            names::STATS_KEY,
            Stats {
                total_auctions: 3,
                total_bids: 0,
            }
            .to_plaintext(),
        );
        m.insert(names::CREATOR_AUCTION_COUNT, "aleo1alice", "2u64");
        m.insert(names::CREATOR_LATEST_AUCTION, "aleo1alice", "12field");
        m.insert(names::AUCTION_PREV_BY_CREATOR, "12field", "11field");
        m.insert(names::AUCTION_PREV_BY_CREATOR, "11field", NULL_FIELD);
        m
    }

    fn ids(entries: &[AuctionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.config.auction_id.as_str()).collect()
    }

    #[test]
    fn test_list_newest_first() {
        let registry = AuctionRegistry::new(chain());
        let entries = registry.list_auctions(&ListFilter::default()).unwrap();
        assert_eq!(ids(&entries), vec!["13field", "12field", "11field"]);
        assert!(entries.iter().all(|e| e.state.is_some()));
    }

    #[test]
    fn test_list_limit_keeps_newest() {
        let registry = AuctionRegistry::new(chain());
        let filter = ListFilter {
            limit: Some(2),
            ..Default::default()
        };
        let entries = registry.list_auctions(&filter).unwrap();
        assert_eq!(ids(&entries), vec!["13field", "12field"]);
    }

    #[test]
    fn test_list_creator_filter() {
        let registry = AuctionRegistry::new(chain());
        let filter = ListFilter {
            creator: Some("aleo1bob".into()),
            ..Default::default()
        };
        let entries = registry.list_auctions(&filter).unwrap();
        assert_eq!(ids(&entries), vec!["13field"]);
    }

    #[test]
    fn test_list_without_stats_is_empty() {
        let registry = AuctionRegistry::new(InMemoryMappings::new());
        assert!(registry.list_auctions(&ListFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_malformed_config() {
        let mut mappings = chain();
        mappings.insert(names::AUCTION_CONFIGS, "12field", "{ auction_id: 12field }");
        let registry = AuctionRegistry::new(mappings);

        let entries = registry.list_auctions(&ListFilter::default()).unwrap();
        assert_eq!(ids(&entries), vec!["13field", "11field"]);
        assert!(registry.config_cache().get("12field").is_none());
    }

    #[test]
    fn test_configs_read_once() {
        let registry = AuctionRegistry::new(CountingReader::new(chain()));

        registry.list_auctions(&ListFilter::default()).unwrap();
        assert_eq!(registry.reader().config_reads.get(), 3);

        registry.list_auctions(&ListFilter::default()).unwrap();
        registry.auction("11field").unwrap();
        assert_eq!(registry.reader().config_reads.get(), 3);
    }

    impl MappingReader for RefCell<InMemoryMappings> {
        fn get_mapping_value(&self, mapping: &str, key: &str) -> QueryResult<Option<String>> {
            self.borrow().get_mapping_value(mapping, key)
        }
    }

    #[test]
    fn test_state_always_fresh() {
        let registry = AuctionRegistry::new(RefCell::new(chain()));
        let entry = registry.auction("11field").unwrap();
        assert_eq!(entry.state.as_ref().unwrap().total_committed, 250);

        registry.reader().borrow_mut().insert(
            names::AUCTION_STATES,
            "11field",
            AuctionState {
                cleared: true,
                clearing_price: 400,
                ..Default::default()
            }
            .to_plaintext(),
        );

        let entry = registry.auction("11field").unwrap();
        assert_eq!(entry.state.as_ref().unwrap().clearing_price, 400);
        assert_eq!(entry.status(10), AuctionStatus::Cleared);
    }

    #[test]
    fn test_auction_not_found() {
        let registry = AuctionRegistry::new(chain());
        assert_eq!(
            registry.auction("99field"),
            Err(RegistryError::AuctionNotFound("99field".into()))
        );
    }

    #[test]
    fn test_creator_walk_and_cache() {
        let registry = AuctionRegistry::new(CountingReader::new(chain()));

        let entries = registry.creator_auctions("aleo1alice").unwrap();
        assert_eq!(ids(&entries), vec!["12field", "11field"]);
        assert_eq!(registry.reader().prev_reads.get(), 2);

        registry.creator_auction_ids("aleo1alice").unwrap();
        assert_eq!(registry.reader().prev_reads.get(), 2);
    }

    #[test]
    fn test_creator_walk_stops_at_count() {
        let mut mappings = chain();
        // Count lags the list: only the newest id is taken.
        mappings.insert(names::CREATOR_AUCTION_COUNT, "aleo1alice", "1u64");
        let registry = AuctionRegistry::new(mappings);

        assert_eq!(registry.creator_auction_ids("aleo1alice").unwrap(), vec!["12field"]);
    }

    #[test]
    fn test_creator_without_auctions() {
        let registry = AuctionRegistry::new(chain());
        assert!(registry.creator_auctions("aleo1bob").unwrap().is_empty());
    }

    #[test]
    fn test_escrow_defaults_and_values() {
        let mut mappings = chain();
        mappings.insert(names::ESCROW_SALES, "11field", "750u128");
        mappings.insert(names::CREATOR_WITHDRAWN, "11field", "2000u128");
        let registry = AuctionRegistry::new(mappings);

        let escrow = registry.escrow("11field").unwrap();
        assert_eq!(
            escrow,
            EscrowBalances {
                sales: 750,
                payments: 0,
                creator_withdrawn: 2000,
                unsold_withdrawn: 0,
            }
        );
    }

    #[test]
    fn test_active_auction_summaries() {
        let mut mappings = chain();
        mappings.insert(
            names::AUCTION_STATES,
            "13field",
            AuctionState {
                supply_met: true,
                total_committed: 1000,
                ..Default::default()
            }
            .to_plaintext(),
        );
        let registry = AuctionRegistry::new(mappings);

        let active = registry.active_auctions(250).unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|s| s.status == AuctionStatus::Active));
        assert_eq!(active[0].auction_id, "12field");
        assert_eq!(active[0].current_price, Some(820));
        assert_eq!(active[0].demand_percent, 25);
    }

    #[test]
    fn test_status_without_state_uses_block_height() {
        let entry = AuctionEntry {
            config: config("1field", "aleo1alice"),
            state: None,
        };
        assert_eq!(entry.status(950), AuctionStatus::Ending);
        assert_eq!(entry.summary(950).demand_percent, 0);
    }
}
