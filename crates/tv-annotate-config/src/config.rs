use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

/// Location of the two bundled reference datasets, relative to the catalog
/// directory unless absolute.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_movies_file")]
    pub movies_file: PathBuf,
    #[serde(default = "default_oscars_file")]
    pub oscars_file: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WindowConfig {
    /// Rolling-window size in days, today included.
    #[serde(default = "default_window_days")]
    pub days: u32,
    /// Override for the program store directory.
    #[serde(default)]
    pub programs_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Localized season/episode markers stripped from the end of series
    /// titles before matching. Adding a language is a data change.
    #[serde(default = "default_series_markers")]
    pub series_markers: Vec<String>,
    /// Allowed distance between the year found in a description and a
    /// candidate's release year. 0 requires an exact match.
    #[serde(default)]
    pub year_tolerance: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrichmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Region whose watch providers are reported.
    #[serde(default = "default_watch_region")]
    pub watch_region: String,
    #[serde(default = "default_enrich_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_movies_file() -> PathBuf {
    PathBuf::from("movies-min.json")
}

fn default_oscars_file() -> PathBuf {
    PathBuf::from("oscars-min.json")
}

fn default_window_days() -> u32 {
    7
}

fn default_series_markers() -> Vec<String> {
    ["сезон", "сез.", "сез", "епизод", "еп.", "еп", "season", "episode", "ep."]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_watch_region() -> String {
    "BG".to_string()
}

fn default_enrich_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            movies_file: default_movies_file(),
            oscars_file: default_oscars_file(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            days: default_window_days(),
            programs_dir: None,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            series_markers: default_series_markers(),
            year_tolerance: 0,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            watch_region: default_watch_region(),
            timeout_secs: default_enrich_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, defaults otherwise.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.window.days == 0 {
            return Err(anyhow::anyhow!("window.days must be at least 1"));
        }
        if self.matching.series_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(anyhow::anyhow!("matching.series_markers must not contain empty markers"));
        }
        if self.enrichment.enabled {
            if self.enrichment.watch_region.is_empty() {
                return Err(anyhow::anyhow!("enrichment.watch_region must not be empty"));
            }
            if self.enrichment.timeout_secs == 0 {
                return Err(anyhow::anyhow!("enrichment.timeout_secs must be at least 1"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.window.days, 7);
        assert_eq!(config.matching.year_tolerance, 0);
        assert_eq!(config.enrichment.watch_region, "BG");
        assert!(config.matching.series_markers.iter().any(|m| m == "сезон"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.window.days = 3;
        config.enrichment.watch_region = "US".to_string();

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.window.days, 3);
        assert_eq!(loaded.enrichment.watch_region, "US");
        assert_eq!(loaded.catalog.movies_file, PathBuf::from("movies-min.json"));
    }

    #[test]
    fn test_config_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.window.days = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.enrichment.watch_region = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.enrichment.enabled = false;
        config.enrichment.watch_region = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.window.days, 7);
    }
}
