//! Shared command setup: config, catalog, exclusions, optional enrichment.

use color_eyre::eyre::Context as _;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tv_annotate_config::{Config, CredentialStore, PathManager};
use tv_annotate_core::{Annotator, Catalog, ExclusionStore, FsDocumentStore, ProgramWindow};
use tv_annotate_enrich::{CachedProvider, EnrichCacheStorage, EnrichmentProvider, TmdbClient};

use crate::output::Output;

pub struct AppContext {
    pub config: Config,
    pub paths: PathManager,
    pub catalog: Catalog,
    pub exclusions: ExclusionStore,
    enrichment: Option<Arc<CachedProvider<TmdbClient>>>,
}

impl AppContext {
    /// Load everything a command needs. Catalog problems are fatal here, at
    /// startup; a missing TMDB key only disables enrichment.
    pub fn load(enrich: bool, output: &Output) -> Result<Self> {
        let paths = PathManager::default();
        let config = Config::load_or_default(&paths.config_file())
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load configuration: {}", e))?;
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

        let catalog = Catalog::load(
            &resolve(&paths.catalog_dir(), &config.catalog.movies_file),
            &resolve(&paths.catalog_dir(), &config.catalog.oscars_file),
        )
        .wrap_err("Failed to load the Oscar catalog (run 'oscarwatch config init' and place the datasets in the catalog directory)")?;

        let exclusions_store = Arc::new(FsDocumentStore::new(paths.data_dir()));
        let exclusions = ExclusionStore::open(exclusions_store, "exclusions.json")
            .wrap_err("Failed to open the exclusion store")?;

        let enrichment = if enrich && config.enrichment.enabled {
            build_enrichment(&paths, &config, output)?
        } else {
            None
        };

        Ok(Self {
            config,
            paths,
            catalog,
            exclusions,
            enrichment,
        })
    }

    pub fn annotator(&self) -> Annotator<'_> {
        let annotator = Annotator::new(&self.catalog, &self.config.matching, &self.exclusions);
        match &self.enrichment {
            Some(provider) => {
                let provider: Arc<dyn EnrichmentProvider> = provider.clone();
                annotator.with_enrichment(provider)
            }
            None => annotator,
        }
    }

    pub fn window(&self) -> ProgramWindow {
        ProgramWindow::new(Arc::new(FsDocumentStore::new(self.programs_dir())))
    }

    pub fn programs_dir(&self) -> PathBuf {
        self.config
            .window
            .programs_dir
            .clone()
            .unwrap_or_else(|| self.paths.programs_dir())
    }

    /// Flush the enrichment cache to disk; failures are reported, not fatal.
    pub fn persist_enrichment(&self, output: &Output) {
        if let Some(provider) = &self.enrichment {
            if let Err(e) = provider.persist() {
                output.warn(format!("Failed to persist enrichment cache: {}", e));
            }
        }
    }
}

fn build_enrichment(
    paths: &PathManager,
    config: &Config,
    output: &Output,
) -> Result<Option<Arc<CachedProvider<TmdbClient>>>> {
    let mut credentials = CredentialStore::new(paths.credentials_file());
    credentials
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;

    let Some(api_key) = credentials.get_tmdb_api_key() else {
        output.warn("No TMDB API key configured; watch providers will be omitted (set one with 'oscarwatch config tmdb')");
        return Ok(None);
    };

    let client = TmdbClient::new(
        api_key,
        config.enrichment.watch_region.clone(),
        Duration::from_secs(config.enrichment.timeout_secs),
    )?;
    let storage = EnrichCacheStorage::new(&paths.enrich_cache_dir());
    let provider = CachedProvider::with_storage(client, storage)?;
    info!(
        "Enrichment enabled (region {}, timeout {}s)",
        config.enrichment.watch_region, config.enrichment.timeout_secs
    );
    Ok(Some(Arc::new(provider)))
}

fn resolve(base: &std::path::Path, file: &std::path::Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base.join(file)
    }
}
