//! Immutable in-memory reference table of Oscar films, built once at startup
//! from the two bundled datasets (movie metadata + ceremony outcomes).

use crate::normalize::normalize;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;
use tv_annotate_models::CatalogEntry;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Movie record as stored in the movies dataset. Years and external ids show
/// up both as numbers and as strings across dataset revisions.
#[derive(Debug, Deserialize)]
struct MovieRecord {
    title: Option<String>,
    title_bg: Option<String>,
    #[serde(default)]
    year: Option<NumberOrText>,
    #[serde(default)]
    tmdb_id: Option<NumberOrText>,
    poster_path: Option<String>,
    overview: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

impl NumberOrText {
    fn as_u64(&self) -> Option<u64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One category outcome in the oscars dataset: the winner plus all nominees.
#[derive(Debug, Deserialize)]
struct CategoryOutcome {
    winner: Option<NomineeRecord>,
    #[serde(default)]
    nominees: Option<Vec<NomineeRecord>>,
}

#[derive(Debug, Deserialize)]
struct NomineeRecord {
    id: Option<String>,
}

#[derive(Debug, Default)]
struct OscarOutcome {
    winner: BTreeSet<String>,
    nominee: BTreeSet<String>,
}

/// The assembled catalog: entries plus a normalized-title index. A key maps
/// to every entry sharing that title (remakes), which is the ambiguity the
/// matcher resolves.
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_key: HashMap<String, Vec<usize>>,
}

impl Catalog {
    /// Load and index the datasets. Any failure here is fatal: the process
    /// cannot serve annotation requests without its reference table.
    pub fn load(movies_path: &Path, oscars_path: &Path) -> Result<Self, CatalogError> {
        let movies: HashMap<String, MovieRecord> = read_dataset(movies_path)?;
        let ceremonies: HashMap<String, HashMap<String, CategoryOutcome>> =
            read_dataset(oscars_path)?;

        let mut outcomes: HashMap<String, OscarOutcome> = HashMap::new();
        for categories in ceremonies.values() {
            for (category, outcome) in categories {
                if let Some(id) = outcome.winner.as_ref().and_then(|w| w.id.as_deref()) {
                    let entry = outcomes.entry(id.to_string()).or_default();
                    entry.winner.insert(category.clone());
                    entry.nominee.insert(category.clone());
                }
                for nominee in outcome.nominees.iter().flatten() {
                    if let Some(id) = nominee.id.as_deref() {
                        outcomes
                            .entry(id.to_string())
                            .or_default()
                            .nominee
                            .insert(category.clone());
                    }
                }
            }
        }

        // Only films with at least one Oscar outcome enter the catalog;
        // iteration over sorted ids keeps entry order stable across runs.
        let mut ids: Vec<&String> = movies.keys().collect();
        ids.sort();

        let mut entries = Vec::new();
        for id in ids {
            let Some(outcome) = outcomes.get(id.as_str()) else {
                continue;
            };
            let movie = &movies[id];
            let Some(title_en) = movie.title.clone().filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            entries.push(CatalogEntry {
                id: id.clone(),
                title_en,
                title_bg: movie.title_bg.clone().filter(|t| !t.trim().is_empty()),
                year: movie
                    .year
                    .as_ref()
                    .and_then(NumberOrText::as_u64)
                    .and_then(|y| u16::try_from(y).ok()),
                tmdb_id: movie.tmdb_id.as_ref().and_then(NumberOrText::as_u64),
                poster_path: movie.poster_path.clone(),
                overview: movie.overview.clone(),
                winner_categories: outcome.winner.clone(),
                nominee_categories: outcome.nominee.clone(),
            });
        }

        let catalog = Self::from_entries(entries);
        info!(
            "Loaded Oscar catalog: {} films, {} title keys",
            catalog.entries.len(),
            catalog.by_key.len()
        );
        Ok(catalog)
    }

    /// Build a catalog from already-assembled entries (tests, alternate
    /// dataset loaders).
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            for title in [Some(entry.title_en.as_str()), entry.title_bg.as_deref()]
                .into_iter()
                .flatten()
            {
                let key = normalize(title);
                if key.is_empty() {
                    continue;
                }
                let indices = by_key.entry(key).or_default();
                if !indices.contains(&index) {
                    indices.push(index);
                }
            }
        }
        Self { entries, by_key }
    }

    /// All entries whose normalized English or localized title equals `key`.
    pub fn lookup(&self, key: &str) -> Vec<&CatalogEntry> {
        self.by_key
            .get(key)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    pub fn all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_dataset<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
