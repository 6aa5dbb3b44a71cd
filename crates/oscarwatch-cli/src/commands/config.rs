use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::Input;
use tv_annotate_config::{Config, CredentialStore, PathManager};

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();

    match cmd {
        ConfigCommands::Show => {
            let config = Config::load_or_default(&paths.config_file())
                .map_err(|e| eyre!("Failed to load configuration: {}", e))?;
            let mut credentials = CredentialStore::new(paths.credentials_file());
            credentials
                .load()
                .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

            if output.is_human() {
                output.info(format!("Config file: {}", paths.config_file().display()));
                output.println(toml::to_string_pretty(&config)?);
                let key_state = if credentials.get_tmdb_api_key().is_some() {
                    "configured"
                } else {
                    "not set"
                };
                output.println(format!("TMDB API key: {}", key_state));
            } else {
                output.json(&serde_json::json!({
                    "config_file": paths.config_file(),
                    "config": toml::to_string(&config)?,
                    "tmdb_api_key_configured": credentials.get_tmdb_api_key().is_some(),
                }));
            }
        }
        ConfigCommands::Init => {
            paths
                .ensure_directories()
                .map_err(|e| eyre!("Failed to create directories: {}", e))?;
            let config_file = paths.config_file();
            if config_file.exists() {
                output.warn(format!(
                    "Config file already exists: {}",
                    config_file.display()
                ));
            } else {
                Config::default()
                    .save_to_file(&config_file)
                    .map_err(|e| eyre!("Failed to write config: {}", e))?;
                output.success(format!("Wrote default config to {}", config_file.display()));
            }
            output.info(format!(
                "Place the catalog datasets in {} and program day files in {}",
                paths.catalog_dir().display(),
                paths.programs_dir().display()
            ));
        }
        ConfigCommands::Tmdb { api_key } => {
            let api_key = match api_key {
                Some(key) => key,
                None => Input::<String>::new()
                    .with_prompt("TMDB API key")
                    .interact_text()?,
            };
            if api_key.trim().is_empty() {
                output.error("API key must not be empty");
                return Ok(());
            }

            let mut credentials = CredentialStore::new(paths.credentials_file());
            credentials
                .load()
                .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
            credentials.set_tmdb_api_key(api_key.trim().to_string());
            credentials
                .save()
                .map_err(|e| eyre!("Failed to save credentials: {}", e))?;
            output.success("TMDB API key saved");
        }
    }

    Ok(())
}
