//! Repository layer over the two JSON data files

pub mod equipment;
pub mod store;
pub mod users;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    config::StorageConfig,
    error::AppResult,
    models::{equipment::Catalog, user::UserDirectory},
};

/// Main repository struct holding both stores and the writer lock
#[derive(Clone)]
pub struct Repository {
    pub equipment: equipment::EquipmentRepository,
    pub users: users::UsersRepository,
    writer: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(config.equipment_path()),
            users: users::UsersRepository::new(config.users_path()),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Acquire exclusive access to both files. Every load/mutate/save
    /// sequence runs while the returned guard is alive.
    pub async fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            _guard: self.writer.lock().await,
            repository: self,
        }
    }
}

/// Exclusive handle on the data files
pub struct StoreGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    repository: &'a Repository,
}

impl StoreGuard<'_> {
    pub async fn catalog(&self) -> AppResult<Catalog> {
        self.repository.equipment.load().await
    }

    pub async fn save_catalog(&self, catalog: &Catalog) -> AppResult<()> {
        self.repository.equipment.save(catalog).await
    }

    pub async fn users(&self) -> AppResult<UserDirectory> {
        self.repository.users.load().await
    }

    pub async fn save_users(&self, users: &UserDirectory) -> AppResult<()> {
        self.repository.users.save(users).await
    }
}
