use serde::{Deserialize, Serialize};

/// Oscar metadata attached to a broadcast once it matched a catalog entry
/// and no exclusion rule applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OscarAnnotation {
    /// Number of categories won.
    pub winner: usize,
    /// Number of categories nominated in (wins included).
    pub nominee: usize,
    pub winner_categories: Vec<String>,
    pub nominee_categories: Vec<String>,
    pub title_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch: Option<WatchProviders>,
}

/// Where a film can currently be streamed/rented in the configured region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProviders {
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flatrate: Vec<ProviderEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rent: Vec<ProviderEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buy: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderEntry {
    pub provider_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
}
