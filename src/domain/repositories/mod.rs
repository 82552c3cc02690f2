use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Dish, StorageUnit, User};

/// Gateway to user persistence. Every operation either returns the requested
/// row or a `DomainError`; `NotFound` stays distinguishable from `Internal`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: i64) -> DomainResult<User>;
    async fn get_by_email(&self, email: &str) -> DomainResult<User>;
    async fn get_by_alexa(&self, alexa_id: &str) -> DomainResult<User>;
    /// Returns the persisted row including the store-assigned id. A duplicate
    /// email fails with `Conflict`.
    async fn create(&self, user: &User) -> DomainResult<User>;
    /// Single-statement conditional insert keyed on email: inserts the user if
    /// no row carries that email, otherwise returns the existing row untouched.
    /// Concurrent first-time provisioning for one email converges on one row.
    async fn create_if_absent(&self, user: &User) -> DomainResult<User>;
    /// Full-record replace by id; fails `NotFound` if the id does not exist.
    async fn update(&self, user: &User) -> DomainResult<User>;
}

#[async_trait]
pub trait DishRepository: Send + Sync {
    async fn get(&self, id: i64) -> DomainResult<Dish>;
    /// An empty result set is an empty vec, not an error; callers decide what
    /// emptiness means.
    async fn list(&self) -> DomainResult<Vec<Dish>>;
    async fn list_by_user(&self, user_id: i64) -> DomainResult<Vec<Dish>>;
    async fn create(&self, dish: &Dish) -> DomainResult<Dish>;
    async fn update(&self, dish: &Dish) -> DomainResult<Dish>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
}

#[async_trait]
pub trait StorageRepository: Send + Sync {
    async fn get(&self, id: i64) -> DomainResult<StorageUnit>;
    async fn list_by_user(&self, user_id: i64) -> DomainResult<Vec<StorageUnit>>;
    async fn create(&self, storage: &StorageUnit) -> DomainResult<StorageUnit>;
    async fn update(&self, storage: &StorageUnit) -> DomainResult<StorageUnit>;
    async fn delete(&self, id: i64) -> DomainResult<()>;
}
