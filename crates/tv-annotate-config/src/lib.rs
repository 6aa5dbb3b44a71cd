pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{CatalogConfig, Config, EnrichmentConfig, MatchingConfig, WindowConfig};
pub use credentials::CredentialStore;
pub use paths::PathManager;
