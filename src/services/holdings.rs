//! Collect and replace: moving quantity between the catalog and a user's holdings

use crate::{
    error::{AppError, AppResult},
    models::user::{Holding, Holdings},
    repository::Repository,
};

#[derive(Clone)]
pub struct HoldingsService {
    repository: Repository,
}

impl HoldingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Equipment currently held by `username`
    pub async fn my_equipment(&self, username: &str) -> AppResult<Holdings> {
        let users = self.repository.lock().await.users().await?;
        users
            .get(username)
            .map(|account| account.holdings.clone())
            .ok_or_else(|| unknown_user(username))
    }

    /// Move `quantity` units of `equipment_id` from the catalog into the
    /// user's holdings. Returns the updated holding.
    pub async fn collect(
        &self,
        username: &str,
        equipment_id: &str,
        quantity: u32,
    ) -> AppResult<Holding> {
        let store = self.repository.lock().await;
        let mut catalog = store.catalog().await?;
        let mut users = store.users().await?;

        let account = users.get_mut(username).ok_or_else(|| unknown_user(username))?;
        let equipment = catalog
            .get_mut(equipment_id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment ID {} not found", equipment_id)))?;

        if quantity == 0 {
            return Err(AppError::Validation("Quantity must be at least 1".to_string()));
        }
        if quantity > equipment.quantity {
            tracing::warn!(
                "{} asked for {} x {} but only {} available",
                username,
                quantity,
                equipment_id,
                equipment.quantity
            );
            return Err(AppError::InsufficientStock(format!(
                "Only {} unit(s) of {} available",
                equipment.quantity, equipment_id
            )));
        }

        let held = account
            .held_quantity(equipment_id)
            .checked_add(quantity)
            .ok_or_else(|| too_many(equipment_id))?;

        equipment.quantity -= quantity;
        let holding = account
            .holdings
            .entry(equipment_id.to_string())
            .and_modify(|h| h.quantity = held)
            .or_insert_with(|| Holding {
                name: equipment.name.clone(),
                category: equipment.category.clone(),
                quantity,
            })
            .clone();

        store.save_catalog(&catalog).await?;
        store.save_users(&users).await?;

        tracing::info!("{} collected {} x {}", username, quantity, equipment_id);
        Ok(holding)
    }

    /// Exchange the user's whole holding of `old_id` for the same quantity of
    /// `new_id`. Returns the resulting holding of `new_id`.
    pub async fn replace(&self, username: &str, old_id: &str, new_id: &str) -> AppResult<Holding> {
        if old_id == new_id {
            return Err(AppError::Validation(
                "Choose a different equipment ID to replace with".to_string(),
            ));
        }

        let store = self.repository.lock().await;
        let mut catalog = store.catalog().await?;
        let mut users = store.users().await?;

        let account = users.get_mut(username).ok_or_else(|| unknown_user(username))?;
        if !account.holdings.contains_key(old_id) {
            return Err(AppError::NotFound(format!("You do not hold equipment {}", old_id)));
        }
        let quantity = account.held_quantity(old_id);

        let returned = catalog
            .get(old_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Equipment ID {} is no longer in the catalog", old_id))
            })?
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| too_many(old_id))?;
        let held = account
            .held_quantity(new_id)
            .checked_add(quantity)
            .ok_or_else(|| too_many(new_id))?;

        let new_equipment = catalog
            .get_mut(new_id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment ID {} not found", new_id)))?;

        if new_equipment.quantity < quantity {
            tracing::warn!(
                "{} cannot replace {} x {} with {}: {} in stock",
                username,
                quantity,
                old_id,
                new_id,
                new_equipment.quantity
            );
            return Err(AppError::InsufficientStock(
                "Not enough stock to replace with selected equipment.".to_string(),
            ));
        }

        new_equipment.quantity -= quantity;
        let snapshot = Holding {
            name: new_equipment.name.clone(),
            category: new_equipment.category.clone(),
            quantity,
        };
        if let Some(old_equipment) = catalog.get_mut(old_id) {
            old_equipment.quantity = returned;
        }

        account.holdings.shift_remove(old_id);
        let holding = account
            .holdings
            .entry(new_id.to_string())
            .and_modify(|h| h.quantity = held)
            .or_insert(snapshot)
            .clone();

        store.save_catalog(&catalog).await?;
        store.save_users(&users).await?;

        tracing::info!("{} replaced {} x {} with {}", username, quantity, old_id, new_id);
        Ok(holding)
    }
}

fn unknown_user(username: &str) -> AppError {
    AppError::UserNotFound(format!("User {} not found", username))
}

fn too_many(equipment_id: &str) -> AppError {
    AppError::Validation(format!("Quantity of {} would exceed the supported maximum", equipment_id))
}
