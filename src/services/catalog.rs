//! Equipment catalog service (admin operations and listings)

use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{Catalog, CatalogEntry, CreateEquipment, Equipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Full catalog in insertion order
    pub async fn list(&self) -> AppResult<Catalog> {
        self.repository.lock().await.catalog().await
    }

    /// Get equipment by ID
    pub async fn get(&self, id: &str) -> AppResult<Equipment> {
        self.list()
            .await?
            .shift_remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment ID {} not found", id)))
    }

    /// Add a new record. The ID must be non-empty and not yet in the catalog.
    pub async fn insert(&self, data: CreateEquipment) -> AppResult<CatalogEntry> {
        data.validate()?;
        if data.id.trim().is_empty() {
            return Err(AppError::Validation("Equipment ID must not be empty".to_string()));
        }
        if data.price < Decimal::ZERO {
            return Err(AppError::Validation("Price must not be negative".to_string()));
        }

        let store = self.repository.lock().await;
        let mut catalog = store.catalog().await?;

        if catalog.contains_key(&data.id) {
            tracing::warn!("Rejected insert of existing equipment {}", data.id);
            return Err(AppError::Conflict("Equipment ID already exists".to_string()));
        }

        let equipment = Equipment {
            name: data.name,
            category: data.category,
            price: data.price,
            quantity: data.quantity,
            date: data.date.unwrap_or_else(|| chrono::Local::now().date_naive()),
        };
        catalog.insert(data.id.clone(), equipment.clone());
        store.save_catalog(&catalog).await?;

        tracing::info!("Equipment {} added ({} units)", data.id, equipment.quantity);
        Ok(CatalogEntry {
            id: data.id,
            equipment,
        })
    }

    /// Remove a record by ID
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let store = self.repository.lock().await;
        let mut catalog = store.catalog().await?;

        if catalog.shift_remove(id).is_none() {
            tracing::warn!("Delete of unknown equipment {}", id);
            return Err(AppError::NotFound("Equipment ID not found".to_string()));
        }
        store.save_catalog(&catalog).await?;

        tracing::info!("Equipment {} deleted", id);
        Ok(())
    }
}
