use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    errors::{DomainError, DomainResult},
    models::{Dish, StorageUnit, User},
    repositories::{DishRepository, StorageRepository, UserRepository},
};

fn not_found(what: &str, id: i64) -> DomainError {
    DomainError::NotFound(format!("{what} {id} not found"))
}

#[derive(Default)]
struct UserTable {
    rows: HashMap<i64, User>,
    next_id: i64,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: i64) -> DomainResult<User> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or_else(|| not_found("user", id))
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<User> {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("user with email {email} not found")))
    }

    async fn get_by_alexa(&self, alexa_id: &str) -> DomainResult<User> {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .find(|u| !u.alexa_user_id.is_empty() && u.alexa_user_id == alexa_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound("user with alexa id not found".to_string()))
    }

    async fn create(&self, user: &User) -> DomainResult<User> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict(format!(
                "user with email {} already exists",
                user.email
            )));
        }
        table.next_id += 1;
        let mut row = user.clone();
        row.user_id = table.next_id;
        table.rows.insert(row.user_id, row.clone());
        Ok(row)
    }

    async fn create_if_absent(&self, user: &User) -> DomainResult<User> {
        // Check and insert happen under one write lock, mirroring the
        // single-statement conditional insert of the Postgres repository.
        let mut table = self.table.write().await;
        if let Some(existing) = table.rows.values().find(|u| u.email == user.email) {
            return Ok(existing.clone());
        }
        table.next_id += 1;
        let mut row = user.clone();
        row.user_id = table.next_id;
        table.rows.insert(row.user_id, row.clone());
        Ok(row)
    }

    async fn update(&self, user: &User) -> DomainResult<User> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&user.user_id) {
            return Err(not_found("user", user.user_id));
        }
        table.rows.insert(user.user_id, user.clone());
        Ok(user.clone())
    }
}

#[derive(Default)]
struct DishTable {
    rows: HashMap<i64, Dish>,
    next_id: i64,
}

#[derive(Default)]
pub struct InMemoryDishRepository {
    table: Arc<RwLock<DishTable>>,
}

impl InMemoryDishRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DishRepository for InMemoryDishRepository {
    async fn get(&self, id: i64) -> DomainResult<Dish> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or_else(|| not_found("dish", id))
    }

    async fn list(&self) -> DomainResult<Vec<Dish>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn list_by_user(&self, user_id: i64) -> DomainResult<Vec<Dish>> {
        let table = self.table.read().await;
        let mut dishes: Vec<Dish> = table
            .rows
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        dishes.sort_by_key(|d| d.personal_dish_id);
        Ok(dishes)
    }

    async fn create(&self, dish: &Dish) -> DomainResult<Dish> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let mut row = dish.clone();
        row.dish_id = table.next_id;
        row.personal_dish_id = table
            .rows
            .values()
            .filter(|d| d.user_id == row.user_id)
            .map(|d| d.personal_dish_id)
            .max()
            .unwrap_or(0)
            + 1;
        table.rows.insert(row.dish_id, row.clone());
        Ok(row)
    }

    async fn update(&self, dish: &Dish) -> DomainResult<Dish> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&dish.dish_id) {
            return Err(not_found("dish", dish.dish_id));
        }
        table.rows.insert(dish.dish_id, dish.clone());
        Ok(dish.clone())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or_else(|| not_found("dish", id))
    }
}

#[derive(Default)]
struct StorageTable {
    rows: HashMap<i64, StorageUnit>,
    next_id: i64,
}

#[derive(Default)]
pub struct InMemoryStorageRepository {
    table: Arc<RwLock<StorageTable>>,
}

impl InMemoryStorageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageRepository for InMemoryStorageRepository {
    async fn get(&self, id: i64) -> DomainResult<StorageUnit> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or_else(|| not_found("storage", id))
    }

    async fn list_by_user(&self, user_id: i64) -> DomainResult<Vec<StorageUnit>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, storage: &StorageUnit) -> DomainResult<StorageUnit> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let mut row = storage.clone();
        row.storage_id = table.next_id;
        table.rows.insert(row.storage_id, row.clone());
        Ok(row)
    }

    async fn update(&self, storage: &StorageUnit) -> DomainResult<StorageUnit> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&storage.storage_id) {
            return Err(not_found("storage", storage.storage_id));
        }
        table.rows.insert(storage.storage_id, storage.clone());
        Ok(storage.clone())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("storage", id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn user(email: &str) -> User {
        User {
            user_id: 0,
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            full_name: "Ada Lovelace".to_string(),
            created_date: "2020-10-01T12:00:00".to_string(),
            access_token: "tok".to_string(),
            refresh_token: String::new(),
            alexa_user_id: String::new(),
            admin: false,
            temp_match: String::new(),
        }
    }

    fn dish(user_id: i64, title: &str) -> Dish {
        Dish {
            dish_id: 0,
            personal_dish_id: 0,
            user_id,
            storage_id: 1,
            title: title.to_string(),
            description: String::new(),
            created_date: "2020-10-01T12:00".to_string(),
            expire_date: "2020-10-13T08:00".to_string(),
            priority: "normal".to_string(),
            dish_type: "meal".to_string(),
            portions: 2,
            temp_match: String::new(),
        }
    }

    #[tokio::test]
    async fn create_assigns_an_id_and_rejects_a_duplicate_email() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(&user("ada@example.com")).await.unwrap();
        assert!(created.user_id > 0);

        let err = repo.create(&user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn list_returns_dishes_across_all_users() {
        let repo = InMemoryDishRepository::new();
        repo.create(&dish(7, "Stew")).await.unwrap();
        repo.create(&dish(8, "Salad")).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);

        let scoped = repo.list_by_user(7).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].title, "Stew");
    }

    #[tokio::test]
    async fn concurrent_creates_assign_distinct_per_user_ids() {
        let repo = Arc::new(InMemoryDishRepository::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create(&dish(7, &format!("Dish {i}"))).await
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            let created = handle.await.unwrap().unwrap();
            assert!(
                seen.insert(created.personal_dish_id),
                "personal dish id {} assigned twice",
                created.personal_dish_id
            );
        }
        assert_eq!(seen.len(), 8);
    }
}
