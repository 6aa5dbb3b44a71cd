//! Caching wrapper around any enrichment provider.

use crate::cache_storage::EnrichCacheStorage;
use crate::provider::{EnrichError, EnrichmentProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;
use tv_annotate_models::WatchProviders;

struct CacheState {
    map: HashMap<u64, Option<WatchProviders>>,
    dirty: bool,
}

/// Memoizes watch-provider lookups by TMDB id for the process lifetime, with
/// optional persistence across runs.
///
/// Negative lookups (`Ok(None)`) are cached too; provider errors are
/// propagated and never cached, so a transient outage cannot poison the
/// durable cache.
pub struct CachedProvider<P> {
    inner: P,
    state: Mutex<CacheState>,
    storage: Option<EnrichCacheStorage>,
}

impl<P: EnrichmentProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            state: Mutex::new(CacheState {
                map: HashMap::new(),
                dirty: false,
            }),
            storage: None,
        }
    }

    /// Seed the cache from disk and persist back on [`CachedProvider::persist`].
    pub fn with_storage(inner: P, storage: EnrichCacheStorage) -> Result<Self, EnrichError> {
        let map = storage.load()?;
        Ok(Self {
            inner,
            state: Mutex::new(CacheState { map, dirty: false }),
            storage: Some(storage),
        })
    }

    /// Write the cache back if anything changed since load.
    pub fn persist(&self) -> Result<(), EnrichError> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let mut state = self.lock();
        if !state.dirty {
            return Ok(());
        }
        storage.save(&state.map)?;
        state.dirty = false;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<P: EnrichmentProvider> EnrichmentProvider for CachedProvider<P> {
    async fn watch_providers(&self, tmdb_id: u64) -> Result<Option<WatchProviders>, EnrichError> {
        if let Some(cached) = self.lock().map.get(&tmdb_id).cloned() {
            debug!("Enrichment cache hit: tmdb {}", tmdb_id);
            return Ok(cached);
        }

        let fetched = self.inner.watch_providers(tmdb_id).await?;

        let mut state = self.lock();
        state.map.insert(tmdb_id, fetched.clone());
        state.dirty = true;
        Ok(fetched)
    }
}
