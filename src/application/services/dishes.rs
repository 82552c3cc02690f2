use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Dish;
use crate::domain::repositories::{DishRepository, StorageRepository};

/// Dish CRUD scoped to the calling user, plus the expiration query.
pub struct DishService {
    dishes: Arc<dyn DishRepository>,
    storages: Arc<dyn StorageRepository>,
}

impl DishService {
    pub fn new(dishes: Arc<dyn DishRepository>, storages: Arc<dyn StorageRepository>) -> Self {
        Self { dishes, storages }
    }

    /// A dish owned by a different user reads as absent, never as forbidden.
    pub async fn get(&self, user_id: i64, id: i64) -> DomainResult<Dish> {
        let dish = self.dishes.get(id).await.map_err(|err| match err {
            DomainError::NotFound(_) => err,
            _ => DomainError::Internal(format!("dish service: could not get dish {id}")),
        })?;
        if dish.user_id != user_id {
            return Err(DomainError::NotFound(format!("dish {id} not found")));
        }
        Ok(dish)
    }

    pub async fn list(&self, user_id: i64) -> DomainResult<Vec<Dish>> {
        let dishes = self
            .dishes
            .list_by_user(user_id)
            .await
            .map_err(|_| DomainError::Internal("dish service: could not list dishes".to_string()))?;
        if dishes.is_empty() {
            return Err(DomainError::NotFound("no dishes".to_string()));
        }
        Ok(dishes)
    }

    /// Dishes of `user_id` whose stored expiry lies before `now`. A dish with
    /// an unparsable expiry fails the whole query.
    pub async fn expired(&self, user_id: i64, now: NaiveDateTime) -> DomainResult<Vec<Dish>> {
        let dishes = self
            .dishes
            .list_by_user(user_id)
            .await
            .map_err(|_| DomainError::Internal("dish service: could not list dishes".to_string()))?;

        let mut expired = Vec::new();
        for dish in dishes {
            if dish.is_expired_at(now)? {
                expired.push(dish);
            }
        }
        Ok(expired)
    }

    pub async fn create(&self, user_id: i64, mut dish: Dish) -> DomainResult<Dish> {
        dish.user_id = user_id;
        self.check_storage_ownership(user_id, dish.storage_id).await?;
        self.dishes
            .create(&dish)
            .await
            .map_err(|err| match err {
                DomainError::Conflict(_) => err,
                _ => DomainError::Internal("dish service: could not create dish".to_string()),
            })
    }

    pub async fn update(&self, user_id: i64, mut dish: Dish) -> DomainResult<Dish> {
        // Ownership of both the dish and the target storage must hold.
        let existing = self.get(user_id, dish.dish_id).await?;
        dish.user_id = user_id;
        dish.personal_dish_id = existing.personal_dish_id;
        self.check_storage_ownership(user_id, dish.storage_id).await?;
        self.dishes.update(&dish).await.map_err(|err| match err {
            DomainError::NotFound(_) => err,
            _ => DomainError::Internal("dish service: could not update dish".to_string()),
        })
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> DomainResult<()> {
        self.get(user_id, id).await?;
        self.dishes.delete(id).await.map_err(|err| match err {
            DomainError::NotFound(_) => err,
            _ => DomainError::Internal("dish service: could not delete dish".to_string()),
        })
    }

    /// Referential invariant: a dish's storage must exist and be owned by the
    /// dish's user. Enforced here; the store does not check it.
    async fn check_storage_ownership(&self, user_id: i64, storage_id: i64) -> DomainResult<()> {
        match self.storages.get(storage_id).await {
            Ok(storage) if storage.user_id == user_id => Ok(()),
            Ok(_) | Err(DomainError::NotFound(_)) => Err(DomainError::BadRequest(format!(
                "storage {storage_id} does not belong to user {user_id}"
            ))),
            Err(_) => Err(DomainError::Internal(
                "dish service: could not check storage ownership".to_string(),
            )),
        }
    }
}
