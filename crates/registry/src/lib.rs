//! Read-side access to fairdrop auction data.
//!
//! The program keeps its public state in mappings. This crate reads them
//! through the [`MappingReader`] seam and layers on:
//!
//! - Config caching: auction configs are write-once and cached indefinitely,
//!   optionally persisted to disk
//! - Enumeration: all auctions through `auction_index`, newest first, and a
//!   creator's auctions through the on-chain linked list
//! - Summaries combining config, fresh state and the pricing engine
//!
//! # Architecture
//!
//! - `mappings`: reader trait, mapping names, in-memory implementation
//! - `cache`: config and creator-index caches
//! - `queries`: the [`AuctionRegistry`] front-end
//! - `config`: registry configuration
//! - `error`: error types
//!
//! # Example
//!
//! ```ignore
//! use fairdrop_registry::{AuctionRegistry, ListFilter};
//!
//! let registry = AuctionRegistry::new(rpc_reader);
//! for entry in registry.list_auctions(&ListFilter::default())? {
//!     println!("{:?}", entry.summary(block_height));
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod mappings;
pub mod queries;

pub use cache::{ConfigCache, CreatorIndexCache, CONFIG_CACHE_KEY};
pub use config::{ConfigValidationError, RegistryConfig, DEFAULT_FEE, DEFAULT_PROGRAM_ID};
pub use error::RegistryError;
pub use mappings::{names, InMemoryMappings, MappingReader};
pub use queries::{
    summaries, AuctionEntry, AuctionRegistry, AuctionSummary, EscrowBalances, ListFilter, QueryResult,
};
