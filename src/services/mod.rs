//! Business logic services

pub mod auth;
pub mod catalog;
pub mod holdings;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub holdings: holdings::HoldingsService,
}

impl Services {
    /// Create all services over the configured data files
    pub fn new(config: &AppConfig) -> Self {
        let repository = Repository::new(&config.storage);
        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            holdings: holdings::HoldingsService::new(repository),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_repository(dir: &tempfile::TempDir) -> Repository {
    Repository::new(&crate::config::StorageConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    })
}
