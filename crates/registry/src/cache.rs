//! Caches for data that does not change once written on chain.
//!
//! Auction configs are write-once, so cached entries never go stale. The
//! versioned file name allows a clean reset if the config struct layout
//! changes after a redeploy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fairdrop_types::{Address, Field};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::RegistryError;

/// Versioned name of the persistent config cache.
pub const CONFIG_CACHE_KEY: &str = "fairdrop_configs_v1";

/// Ids split by cache presence.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CachePartition {
    /// Cached raw configs by auction id
    pub hits: HashMap<Field, String>,
    /// Ids that must be fetched, in request order
    pub misses: Vec<Field>,
}

/// Raw `auction_configs` values keyed by auction id.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: RwLock<HashMap<Field, String>>,
    /// Backing file; persistence is skipped when unset
    path: Option<PathBuf>,
}

impl ConfigCache {
    /// Create an in-memory cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache persisted under `dir`, loading any previous contents.
    ///
    /// An unreadable or corrupt file starts an empty cache.
    pub fn with_file(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(format!("{CONFIG_CACHE_KEY}.json"));
        let entries = match load_entries(&path) {
            Ok(entries) => {
                debug!(path = %path.display(), entries = entries.len(), "Loaded config cache");
                entries
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Starting with empty config cache");
                HashMap::new()
            }
        };

        Self {
            entries: RwLock::new(entries),
            path: Some(path),
        }
    }

    /// Cached raw config for `auction_id`.
    pub fn get(&self, auction_id: &str) -> Option<String> {
        self.entries.read().get(auction_id).cloned()
    }

    /// Split `ids` into cached entries and ids still to fetch.
    pub fn partition<'a, I>(&self, ids: I) -> CachePartition
    where
        I: IntoIterator<Item = &'a Field>,
    {
        let entries = self.entries.read();
        let mut partition = CachePartition::default();
        for id in ids {
            match entries.get(id) {
                Some(raw) => {
                    partition.hits.insert(id.clone(), raw.clone());
                }
                None => partition.misses.push(id.clone()),
            }
        }
        partition
    }

    /// Add freshly fetched configs and persist them.
    ///
    /// Persistence is best effort: a write failure is logged and the
    /// in-memory entries are kept.
    pub fn insert_many(&self, fetched: HashMap<Field, String>) {
        if fetched.is_empty() {
            return;
        }
        self.entries.write().extend(fetched);

        if let Err(e) = self.persist() {
            warn!(error = %e, "Config cache not persisted");
        }
    }

    /// Write the cache to its backing file, if any.
    pub fn persist(&self) -> Result<(), RegistryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string(&*self.entries.read())
            .map_err(|e| RegistryError::Cache(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RegistryError::Cache(e.to_string()))?;
        }
        std::fs::write(path, json).map_err(|e| RegistryError::Cache(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn load_entries(path: &Path) -> Result<HashMap<Field, String>, RegistryError> {
    let data = std::fs::read_to_string(path).map_err(|e| RegistryError::Cache(e.to_string()))?;
    serde_json::from_str(&data).map_err(|e| RegistryError::Cache(e.to_string()))
}

/// Per-creator auction id lists, newest first.
///
/// Walking the on-chain linked list costs one read per auction. A cached
/// list is reused only while its length equals the creator's current
/// on-chain auction count; any new auction changes the count and forces a
/// fresh walk.
#[derive(Debug, Default)]
pub struct CreatorIndexCache {
    entries: RwLock<HashMap<Address, Vec<Field>>>,
}

impl CreatorIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached ids for `creator`, if they match `count`.
    pub fn get(&self, creator: &str, count: u64) -> Option<Vec<Field>> {
        self.entries
            .read()
            .get(creator)
            .filter(|ids| ids.len() as u64 == count)
            .cloned()
    }

    pub fn store(&self, creator: &str, ids: Vec<Field>) {
        self.entries.write().insert(creator.to_string(), ids);
    }
}
