use async_trait::async_trait;
use tv_annotate_models::WatchProviders;

#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("enrichment request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("enrichment endpoint returned status {0}")]
    Status(u16),
    #[error("enrichment response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("enrichment cache failure: {0}")]
    Cache(String),
}

/// Best-effort external metadata source for matched films.
///
/// Callers treat every error as "no enrichment available"; a failing
/// provider must never fail an annotation.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    /// Where the film can be watched in the configured region, or `None`
    /// when the provider has no data for that region.
    async fn watch_providers(&self, tmdb_id: u64) -> Result<Option<WatchProviders>, EnrichError>;
}
