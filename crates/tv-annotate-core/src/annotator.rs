//! Per-broadcast annotation decision: match, exclusion check, merge.

use crate::catalog::Catalog;
use crate::exclusions::ExclusionStore;
use crate::matcher::{MatchResult, Matcher};
use std::sync::Arc;
use tracing::{debug, warn};
use tv_annotate_config::MatchingConfig;
use tv_annotate_enrich::EnrichmentProvider;
use tv_annotate_models::{AnnotatedBroadcast, BroadcastEntry, CatalogEntry, OscarAnnotation};

/// Decides, per broadcast, whether Oscar metadata gets attached.
///
/// A pure derivation of the current catalog and exclusion state: re-running
/// over the same inputs yields identical output, in any order. Ambiguous
/// matches are treated the same as no match; a wrong annotation is worse
/// than a missing one.
pub struct Annotator<'a> {
    matcher: Matcher<'a>,
    exclusions: &'a ExclusionStore,
    enrichment: Option<Arc<dyn EnrichmentProvider>>,
}

impl<'a> Annotator<'a> {
    pub fn new(
        catalog: &'a Catalog,
        matching: &MatchingConfig,
        exclusions: &'a ExclusionStore,
    ) -> Self {
        Self {
            matcher: Matcher::new(catalog, matching),
            exclusions,
            enrichment: None,
        }
    }

    /// Attach a best-effort watch-provider source. Fetch failures degrade to
    /// an annotation without the `watch` field, never to a failed broadcast.
    pub fn with_enrichment(mut self, provider: Arc<dyn EnrichmentProvider>) -> Self {
        self.enrichment = Some(provider);
        self
    }

    pub async fn annotate(&self, broadcast: &BroadcastEntry) -> AnnotatedBroadcast {
        let entry = match self
            .matcher
            .find(&broadcast.title, broadcast.description.as_deref())
        {
            MatchResult::Single(entry) => entry,
            MatchResult::NoMatch => {
                return AnnotatedBroadcast::unannotated(broadcast.clone());
            }
            MatchResult::Ambiguous(entries) => {
                debug!(
                    "Ambiguous title {:?} ({} candidates), leaving unannotated",
                    broadcast.title,
                    entries.len()
                );
                return AnnotatedBroadcast::unannotated(broadcast.clone());
            }
        };

        if self.exclusions.is_excluded(
            entry.local_title(),
            &broadcast.channel_id,
            broadcast.date,
            broadcast.time,
        ) {
            return AnnotatedBroadcast::unannotated(broadcast.clone());
        }

        let mut annotation = build_annotation(entry);
        annotation.watch = self.fetch_watch(entry).await;

        AnnotatedBroadcast {
            broadcast: broadcast.clone(),
            oscar: Some(annotation),
        }
    }

    /// Annotate a batch sequentially; the enrichment cache makes repeated
    /// films cheap.
    pub async fn annotate_all(&self, broadcasts: &[BroadcastEntry]) -> Vec<AnnotatedBroadcast> {
        let mut annotated = Vec::with_capacity(broadcasts.len());
        for broadcast in broadcasts {
            annotated.push(self.annotate(broadcast).await);
        }
        annotated
    }

    async fn fetch_watch(
        &self,
        entry: &CatalogEntry,
    ) -> Option<tv_annotate_models::WatchProviders> {
        let provider = self.enrichment.as_ref()?;
        let tmdb_id = entry.tmdb_id?;
        match provider.watch_providers(tmdb_id).await {
            Ok(watch) => watch,
            Err(e) => {
                warn!("Watch provider lookup failed for tmdb {}: {}", tmdb_id, e);
                None
            }
        }
    }
}

/// Enumerated field-by-field copy from catalog entry to annotation; the
/// `watch` field is filled by the enrichment step afterwards.
fn build_annotation(entry: &CatalogEntry) -> OscarAnnotation {
    OscarAnnotation {
        winner: entry.winner_count(),
        nominee: entry.nominee_count(),
        winner_categories: entry.winner_categories.iter().cloned().collect(),
        nominee_categories: entry.nominee_categories.iter().cloned().collect(),
        title_en: entry.title_en.clone(),
        year: entry.year,
        poster_path: entry.poster_path.clone(),
        overview: entry.overview.clone(),
        tmdb_id: entry.tmdb_id,
        watch: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusions::ExclusionStore;
    use crate::store::FsDocumentStore;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tv_annotate_enrich::EnrichError;
    use tv_annotate_models::{ExclusionRule, ProviderEntry, WatchProviders};

    fn gladiator() -> CatalogEntry {
        CatalogEntry {
            id: "m1".to_string(),
            title_en: "Gladiator".to_string(),
            title_bg: Some("Гладиатор".to_string()),
            year: Some(2000),
            tmdb_id: Some(98),
            poster_path: Some("/poster.jpg".to_string()),
            overview: Some("Максимус...".to_string()),
            winner_categories: BTreeSet::from([
                "BEST PICTURE".to_string(),
                "ACTOR IN A LEADING ROLE".to_string(),
                "COSTUME DESIGN".to_string(),
                "SOUND".to_string(),
                "VISUAL EFFECTS".to_string(),
            ]),
            nominee_categories: BTreeSet::from([
                "BEST PICTURE".to_string(),
                "ACTOR IN A LEADING ROLE".to_string(),
                "COSTUME DESIGN".to_string(),
                "SOUND".to_string(),
                "VISUAL EFFECTS".to_string(),
                "DIRECTING".to_string(),
            ]),
        }
    }

    fn broadcast(title: &str) -> BroadcastEntry {
        BroadcastEntry {
            channel_id: "bnt".to_string(),
            channel_name: "БНТ 1".to_string(),
            channel_icon: None,
            date: NaiveDate::parse_from_str("2025-02-03", "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str("20:00", "%H:%M").unwrap(),
            title: title.to_string(),
            description: Some("Повторение. Максимус...".to_string()),
        }
    }

    fn empty_exclusions(dir: &std::path::Path) -> ExclusionStore {
        ExclusionStore::open(Arc::new(FsDocumentStore::new(dir)), "exclusions.json").unwrap()
    }

    struct FixedProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EnrichmentProvider for FixedProvider {
        async fn watch_providers(
            &self,
            _tmdb_id: u64,
        ) -> Result<Option<WatchProviders>, EnrichError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(WatchProviders {
                region: "BG".to_string(),
                link: None,
                flatrate: vec![ProviderEntry {
                    provider_name: "StreamCo".to_string(),
                    logo_path: None,
                }],
                rent: Vec::new(),
                buy: Vec::new(),
            }))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl EnrichmentProvider for FailingProvider {
        async fn watch_providers(
            &self,
            _tmdb_id: u64,
        ) -> Result<Option<WatchProviders>, EnrichError> {
            Err(EnrichError::Status(500))
        }
    }

    #[tokio::test]
    async fn test_matched_broadcast_gets_oscar_fields() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_entries(vec![gladiator()]);
        let exclusions = empty_exclusions(dir.path());
        let annotator = Annotator::new(&catalog, &MatchingConfig::default(), &exclusions);

        let result = annotator.annotate(&broadcast("Гладиатор")).await;
        let oscar = result.oscar.expect("should be annotated");
        assert_eq!(oscar.winner, 5);
        assert_eq!(oscar.nominee, 6);
        assert_eq!(oscar.title_en, "Gladiator");
        assert_eq!(oscar.year, Some(2000));
        assert!(oscar.watch.is_none());
        // Original broadcast fields are untouched
        assert_eq!(result.broadcast, broadcast("Гладиатор"));
    }

    #[tokio::test]
    async fn test_channel_exclusion_suppresses_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_entries(vec![gladiator()]);
        let exclusions = empty_exclusions(dir.path());
        let annotator = Annotator::new(&catalog, &MatchingConfig::default(), &exclusions);

        let before = annotator.annotate(&broadcast("Гладиатор")).await;
        assert!(before.is_annotated());

        exclusions
            .add(ExclusionRule::channel("Гладиатор", "bnt"))
            .unwrap();
        let after = annotator.annotate(&broadcast("Гладиатор")).await;
        assert!(!after.is_annotated());
        assert_eq!(after.broadcast, broadcast("Гладиатор"));
    }

    #[tokio::test]
    async fn test_unmatched_and_ambiguous_stay_unannotated() {
        let dir = tempfile::tempdir().unwrap();
        let two_years = vec![
            CatalogEntry {
                id: "a".to_string(),
                year: Some(1990),
                ..gladiator()
            },
            CatalogEntry {
                id: "b".to_string(),
                year: Some(2023),
                ..gladiator()
            },
        ];
        let catalog = Catalog::from_entries(two_years);
        let exclusions = empty_exclusions(dir.path());
        let annotator = Annotator::new(&catalog, &MatchingConfig::default(), &exclusions);

        let mut b = broadcast("Гладиатор");
        b.description = Some("без година".to_string());
        assert!(!annotator.annotate(&b).await.is_annotated());

        assert!(!annotator.annotate(&broadcast("Титаник")).await.is_annotated());
    }

    #[tokio::test]
    async fn test_annotation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_entries(vec![gladiator()]);
        let exclusions = empty_exclusions(dir.path());
        let annotator = Annotator::new(&catalog, &MatchingConfig::default(), &exclusions);

        let first = annotator.annotate(&broadcast("Гладиатор")).await;
        let second = annotator.annotate(&broadcast("Гладиатор")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_enrichment_attaches_watch_providers() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_entries(vec![gladiator()]);
        let exclusions = empty_exclusions(dir.path());
        let annotator = Annotator::new(&catalog, &MatchingConfig::default(), &exclusions)
            .with_enrichment(Arc::new(FixedProvider {
                calls: AtomicUsize::new(0),
            }));

        let result = annotator.annotate(&broadcast("Гладиатор")).await;
        let watch = result.oscar.unwrap().watch.expect("watch providers");
        assert_eq!(watch.region, "BG");
        assert_eq!(watch.flatrate[0].provider_name, "StreamCo");
    }

    #[tokio::test]
    async fn test_enrichment_failure_degrades_to_no_watch_field() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_entries(vec![gladiator()]);
        let exclusions = empty_exclusions(dir.path());
        let annotator = Annotator::new(&catalog, &MatchingConfig::default(), &exclusions)
            .with_enrichment(Arc::new(FailingProvider));

        let result = annotator.annotate(&broadcast("Гладиатор")).await;
        let oscar = result.oscar.expect("annotation survives enrichment failure");
        assert!(oscar.watch.is_none());
    }
}
