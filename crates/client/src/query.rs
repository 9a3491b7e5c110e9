//! Offline mapping snapshots.

use std::path::Path;

use fairdrop_registry::{InMemoryMappings, MappingReader, RegistryError};
use tracing::debug;

use crate::error::ClientError;

/// [`MappingReader`] over a JSON snapshot of program mappings.
///
/// The file has the form `{ "mapping": { "key": "value" } }`, with values in
/// the plaintext layout the RPC returns.
#[derive(Clone, Debug, Default)]
pub struct SnapshotReader {
    mappings: InMemoryMappings,
}

impl SnapshotReader {
    /// Load a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Snapshot(format!("{}: {e}", path.display())))?;
        let reader = Self::from_json(&json)?;
        debug!(path = %path.display(), "Loaded mapping snapshot");
        Ok(reader)
    }

    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        let mappings =
            InMemoryMappings::from_json(json).map_err(|e| ClientError::Snapshot(e.to_string()))?;
        Ok(Self { mappings })
    }

    pub fn mappings(&self) -> &InMemoryMappings {
        &self.mappings
    }
}

impl From<InMemoryMappings> for SnapshotReader {
    fn from(mappings: InMemoryMappings) -> Self {
        Self { mappings }
    }
}

impl MappingReader for SnapshotReader {
    fn get_mapping_value(&self, mapping: &str, key: &str) -> Result<Option<String>, RegistryError> {
        self.mappings.get_mapping_value(mapping, key)
    }
}
