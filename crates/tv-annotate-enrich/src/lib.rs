pub mod cache;
pub mod cache_storage;
pub mod provider;
pub mod tmdb;

pub use cache::CachedProvider;
pub use cache_storage::EnrichCacheStorage;
pub use provider::{EnrichError, EnrichmentProvider};
pub use tmdb::TmdbClient;
