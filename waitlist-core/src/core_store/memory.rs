//! In-process waitlist store
//!
//! Keeps sets and metadata hashes in memory behind a single `RwLock`. Insert
//! and membership test happen under one write guard, which gives the same
//! insert-if-absent guarantee the remote store provides. Used by tests and for
//! local development; contents are lost on restart.

use super::{MetadataFields, StoreResult, WaitlistStore};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    sets: HashMap<String, HashSet<String>>,
    metadata: HashMap<String, MetadataFields>,
}

/// Waitlist store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read back a metadata record
    pub async fn metadata(&self, meta_key: &str) -> Option<MetadataFields> {
        self.state.read().await.metadata.get(meta_key).cloned()
    }

    /// Number of metadata records held
    pub async fn metadata_count(&self) -> usize {
        self.state.read().await.metadata.len()
    }
}

#[async_trait]
impl WaitlistStore for MemoryStore {
    async fn add_to_set(&self, set_key: &str, member: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let added = state
            .sets
            .entry(set_key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(added)
    }

    async fn set_cardinality(&self, set_key: &str) -> StoreResult<u64> {
        let state = self.state.read().await;
        Ok(state.sets.get(set_key).map_or(0, |set| set.len() as u64))
    }

    async fn set_members(&self, set_key: &str) -> StoreResult<Vec<String>> {
        let state = self.state.read().await;
        Ok(state
            .sets
            .get(set_key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn write_metadata(&self, meta_key: &str, fields: &MetadataFields) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let record = state.metadata.entry(meta_key.to_string()).or_default();
        record.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}
