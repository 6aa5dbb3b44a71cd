//! Persisted enrichment cache.
//!
//! Binary format (bincode) with gzip compression; an incompatible file is
//! backed up and replaced with an empty cache rather than failing startup.

use crate::provider::EnrichError;
use bincode::{deserialize, serialize};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tv_annotate_models::WatchProviders;

#[derive(Debug, Serialize, Deserialize)]
struct CachedEntry {
    tmdb_id: u64,
    watch: Option<WatchProviders>,
}

pub struct EnrichCacheStorage {
    cache_path: PathBuf,
}

impl EnrichCacheStorage {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_path: cache_dir.join("watch_providers.bin"),
        }
    }

    pub fn load(&self) -> Result<HashMap<u64, Option<WatchProviders>>, EnrichError> {
        if !self.cache_path.exists() {
            debug!("Enrichment cache file does not exist, starting empty");
            return Ok(HashMap::new());
        }

        let data = std::fs::read(&self.cache_path).map_err(io_err)?;
        let mut decoder = GzDecoder::new(&data[..]);
        let mut decompressed = Vec::new();
        if let Err(e) = decoder.read_to_end(&mut decompressed) {
            self.backup_incompatible(&e.to_string());
            return Ok(HashMap::new());
        }

        let entries: Vec<CachedEntry> = match deserialize(&decompressed) {
            Ok(entries) => entries,
            Err(e) => {
                self.backup_incompatible(&e.to_string());
                return Ok(HashMap::new());
            }
        };

        info!("Loaded enrichment cache: {} entries", entries.len());
        Ok(entries
            .into_iter()
            .map(|e| (e.tmdb_id, e.watch))
            .collect())
    }

    pub fn save(&self, cache: &HashMap<u64, Option<WatchProviders>>) -> Result<(), EnrichError> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let entries: Vec<CachedEntry> = cache
            .iter()
            .map(|(&tmdb_id, watch)| CachedEntry {
                tmdb_id,
                watch: watch.clone(),
            })
            .collect();
        let encoded = serialize(&entries).map_err(|e| EnrichError::Cache(e.to_string()))?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&encoded).map_err(io_err)?;
        let compressed = encoder.finish().map_err(io_err)?;

        std::fs::write(&self.cache_path, compressed).map_err(io_err)?;
        debug!("Saved enrichment cache: {} entries", entries.len());
        Ok(())
    }

    fn backup_incompatible(&self, reason: &str) {
        let backup_path = self.cache_path.with_extension("bin.bak");
        match std::fs::copy(&self.cache_path, &backup_path) {
            Ok(_) => info!(
                "Enrichment cache format incompatible ({}); backed up to {:?} and starting empty",
                reason, backup_path
            ),
            Err(e) => warn!(
                "Enrichment cache incompatible ({}) and backup failed: {}; starting empty",
                reason, e
            ),
        }
    }
}

fn io_err(e: std::io::Error) -> EnrichError {
    EnrichError::Cache(e.to_string())
}
