//! Time-limited cache in front of [`ProfileStore`]
//!
//! Each container file gets its own slot guarded by an async mutex, so a
//! reload and a concurrent read of the same container are serialized while
//! different containers never wait on each other.

use crate::container::{container_file_name, ProfileContainer};
use crate::store::{ProfileStore, StorageResult};
use cronostar_core::PresetType;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Default lifetime of a cached container
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Default)]
struct CacheSlot {
    container: Option<Arc<ProfileContainer>>,
    loaded_at: Option<Instant>,
}

/// Caches loaded containers (including "file missing") for a TTL
pub struct ProfileCache {
    store: ProfileStore,
    ttl: Duration,
    slots: DashMap<String, Arc<Mutex<CacheSlot>>>,
}

impl ProfileCache {
    pub fn new(store: ProfileStore, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            slots: DashMap::new(),
        }
    }

    pub fn with_default_ttl(store: ProfileStore) -> Self {
        Self::new(store, DEFAULT_CACHE_TTL)
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slot(&self, file_name: &str) -> Arc<Mutex<CacheSlot>> {
        self.slots
            .entry(file_name.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Get a container, reloading it from disk once the cached copy expires
    pub async fn get(&self, file_name: &str) -> StorageResult<Option<Arc<ProfileContainer>>> {
        let slot = self.slot(file_name);
        let mut slot = slot.lock().await;

        if let Some(loaded_at) = slot.loaded_at {
            if loaded_at.elapsed() < self.ttl {
                trace!("Cache hit for {}", file_name);
                return Ok(slot.container.clone());
            }
        }

        let container = self.store.load(file_name).await?.map(Arc::new);
        debug!(
            "Cache reload for {} (found: {})",
            file_name,
            container.is_some()
        );

        slot.container = container.clone();
        slot.loaded_at = Some(Instant::now());
        Ok(container)
    }

    /// Drop the cached copy of one container
    pub async fn invalidate(&self, file_name: &str) {
        let slot = self.slots.get(file_name).map(|s| s.value().clone());
        if let Some(slot) = slot {
            let mut slot = slot.lock().await;
            slot.container = None;
            slot.loaded_at = None;
            trace!("Invalidated cache for {}", file_name);
        }
    }

    /// Drop every cached container
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Save a profile through the store while holding the container's slot
    pub async fn save_profile(
        &self,
        preset: PresetType,
        global_prefix: &str,
        profile_name: &str,
        schedule: Vec<serde_json::Value>,
    ) -> StorageResult<String> {
        let file_name = container_file_name(preset, global_prefix);
        let slot = self.slot(&file_name);
        let mut slot = slot.lock().await;

        let result = self
            .store
            .save_profile(preset, global_prefix, profile_name, schedule)
            .await;

        slot.container = None;
        slot.loaded_at = None;
        result
    }

    /// Delete a profile through the store while holding the container's slot
    pub async fn delete_profile(
        &self,
        preset: PresetType,
        global_prefix: &str,
        profile_name: &str,
    ) -> StorageResult<bool> {
        let file_name = container_file_name(preset, global_prefix);
        let slot = self.slot(&file_name);
        let mut slot = slot.lock().await;

        let result = self
            .store
            .delete_profile(preset, global_prefix, profile_name)
            .await;

        slot.container = None;
        slot.loaded_at = None;
        result
    }
}
