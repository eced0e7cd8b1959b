//! Equipment catalog file

use std::path::PathBuf;

use super::store::JsonFile;
use crate::{error::AppResult, models::equipment::Catalog};

#[derive(Clone)]
pub struct EquipmentRepository {
    file: JsonFile<Catalog>,
}

impl EquipmentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// Load the full catalog
    pub async fn load(&self) -> AppResult<Catalog> {
        self.file.load().await
    }

    /// Overwrite the catalog file
    pub async fn save(&self, catalog: &Catalog) -> AppResult<()> {
        self.file.save(catalog).await
    }
}
