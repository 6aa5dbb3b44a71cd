use crate::output::Output;
use color_eyre::Result;
use std::fs;
use std::sync::Arc;
use tv_annotate_config::{Config, PathManager};
use tv_annotate_core::{FsDocumentStore, ProgramWindow};

pub async fn run_clear(
    all: bool,
    enrich_cache: bool,
    old_programs: bool,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::default();

    if all {
        clear_enrich_cache(&paths, output)?;
        prune_old_programs(&paths, output)?;
        output.success("All caches cleared");
        return Ok(());
    }

    let mut cleared_anything = false;

    if enrich_cache {
        clear_enrich_cache(&paths, output)?;
        cleared_anything = true;
    }

    if old_programs {
        prune_old_programs(&paths, output)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --enrich-cache, --old-programs, or --all");
        output.println("\nExample: oscarwatch clear --enrich-cache");
    }

    Ok(())
}

fn clear_enrich_cache(paths: &PathManager, output: &Output) -> Result<()> {
    let cache_dir = paths.enrich_cache_dir();
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        fs::create_dir_all(&cache_dir)?;
        output.success(format!(
            "Cleared enrichment cache: {}",
            cache_dir.display()
        ));
    } else {
        output.info("No enrichment cache found to clear");
    }
    Ok(())
}

fn prune_old_programs(paths: &PathManager, output: &Output) -> Result<()> {
    let config = Config::load_or_default(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load configuration: {}", e))?;
    let programs_dir = config
        .window
        .programs_dir
        .clone()
        .unwrap_or_else(|| paths.programs_dir());

    let window = ProgramWindow::new(Arc::new(FsDocumentStore::new(&programs_dir)));
    let today = chrono::Local::now().date_naive();
    let removed = window.prune(today, config.window.days)?;
    if removed > 0 {
        output.success(format!(
            "Deleted {} program day files older than {} days",
            removed, config.window.days
        ));
    } else {
        output.info("No program day files outside the window");
    }
    Ok(())
}
