use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A film in the Oscar reference catalog.
///
/// Built once at startup from the bundled datasets and immutable afterwards.
/// Category sets are `BTreeSet` so serialized output stays in a stable order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Dataset-internal movie identifier.
    pub id: String,
    /// English title.
    pub title_en: String,
    /// Localized (Bulgarian) title, when the dataset carries one.
    pub title_bg: Option<String>,
    pub year: Option<u16>,
    /// External identifier for runtime enrichment lookups.
    pub tmdb_id: Option<u64>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub winner_categories: BTreeSet<String>,
    pub nominee_categories: BTreeSet<String>,
}

impl CatalogEntry {
    pub fn winner_count(&self) -> usize {
        self.winner_categories.len()
    }

    pub fn nominee_count(&self) -> usize {
        self.nominee_categories.len()
    }

    /// Title used for exclusion-rule comparisons: the localized title when
    /// present, otherwise the English one.
    pub fn local_title(&self) -> &str {
        self.title_bg.as_deref().unwrap_or(&self.title_en)
    }
}
