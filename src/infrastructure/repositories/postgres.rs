use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use crate::domain::{
    errors::{DomainError, DomainResult},
    models::{Dish, StorageUnit, User},
    repositories::{DishRepository, StorageRepository, UserRepository},
};

pub type PgPool = Pool<Postgres>;

fn map_sqlx_err(context: &str, err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::RowNotFound => DomainError::NotFound(format!("{context}: row not found")),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(format!("{context}: unique constraint violated"))
        }
        _ => DomainError::Internal(format!("{context}: {err}")),
    }
}

#[derive(FromRow)]
struct UserRecord {
    user_id: i64,
    email: String,
    first_name: String,
    last_name: String,
    full_name: String,
    created_date: String,
    access_token: String,
    refresh_token: String,
    alexa_user_id: String,
    admin: bool,
    temp_match: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            user_id: record.user_id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            full_name: record.full_name,
            created_date: record.created_date,
            access_token: record.access_token,
            refresh_token: record.refresh_token,
            alexa_user_id: record.alexa_user_id,
            admin: record.admin,
            temp_match: record.temp_match,
        }
    }
}

const USER_COLUMNS: &str = "user_id, email, first_name, last_name, full_name, created_date, \
     access_token, refresh_token, alexa_user_id, admin, temp_match";

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: i64) -> DomainResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("get user", err))?;
        record
            .map(User::from)
            .ok_or_else(|| DomainError::NotFound(format!("user {id} not found")))
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("get user by email", err))?;
        record
            .map(User::from)
            .ok_or_else(|| DomainError::NotFound(format!("user with email {email} not found")))
    }

    async fn get_by_alexa(&self, alexa_id: &str) -> DomainResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE alexa_user_id = $1 AND alexa_user_id <> ''"
        ))
        .bind(alexa_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("get user by alexa id", err))?;
        record
            .map(User::from)
            .ok_or_else(|| DomainError::NotFound("user with alexa id not found".to_string()))
    }

    async fn create(&self, user: &User) -> DomainResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (
                email, first_name, last_name, full_name, created_date,
                access_token, refresh_token, alexa_user_id, admin, temp_match
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.full_name)
        .bind(&user.created_date)
        .bind(&user.access_token)
        .bind(&user.refresh_token)
        .bind(&user.alexa_user_id)
        .bind(user.admin)
        .bind(&user.temp_match)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("create user", err))?;
        Ok(record.into())
    }

    async fn create_if_absent(&self, user: &User) -> DomainResult<User> {
        // Single-writer upsert: the no-op DO UPDATE makes RETURNING yield the
        // existing row when the email is already taken, so concurrent
        // first-time provisioning converges on one row.
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (
                email, first_name, last_name, full_name, created_date,
                access_token, refresh_token, alexa_user_id, admin, temp_match
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
            ON CONFLICT (email) DO UPDATE SET email = excluded.email
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.full_name)
        .bind(&user.created_date)
        .bind(&user.access_token)
        .bind(&user.refresh_token)
        .bind(&user.alexa_user_id)
        .bind(user.admin)
        .bind(&user.temp_match)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("create user if absent", err))?;
        Ok(record.into())
    }

    async fn update(&self, user: &User) -> DomainResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                email = $2,
                first_name = $3,
                last_name = $4,
                full_name = $5,
                created_date = $6,
                access_token = $7,
                refresh_token = $8,
                alexa_user_id = $9,
                admin = $10,
                temp_match = $11
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.full_name)
        .bind(&user.created_date)
        .bind(&user.access_token)
        .bind(&user.refresh_token)
        .bind(&user.alexa_user_id)
        .bind(user.admin)
        .bind(&user.temp_match)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("update user", err))?;
        record
            .map(User::from)
            .ok_or_else(|| DomainError::NotFound(format!("user {} not found", user.user_id)))
    }
}

#[derive(FromRow)]
struct DishRecord {
    dish_id: i64,
    personal_dish_id: i64,
    user_id: i64,
    storage_id: i64,
    title: String,
    description: String,
    created_date: String,
    expire_date: String,
    priority: String,
    dish_type: String,
    portions: i32,
    temp_match: String,
}

impl From<DishRecord> for Dish {
    fn from(record: DishRecord) -> Self {
        Dish {
            dish_id: record.dish_id,
            personal_dish_id: record.personal_dish_id,
            user_id: record.user_id,
            storage_id: record.storage_id,
            title: record.title,
            description: record.description,
            created_date: record.created_date,
            expire_date: record.expire_date,
            priority: record.priority,
            dish_type: record.dish_type,
            portions: record.portions,
            temp_match: record.temp_match,
        }
    }
}

const DISH_COLUMNS: &str = "dish_id, personal_dish_id, user_id, storage_id, title, description, \
     created_date, expire_date, priority, dish_type, portions, temp_match";

#[derive(Clone)]
pub struct PostgresDishRepository {
    pool: PgPool,
}

impl PostgresDishRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl DishRepository for PostgresDishRepository {
    async fn get(&self, id: i64) -> DomainResult<Dish> {
        let record = sqlx::query_as::<_, DishRecord>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE dish_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("get dish", err))?;
        record
            .map(Dish::from)
            .ok_or_else(|| DomainError::NotFound(format!("dish {id} not found")))
    }

    async fn list(&self) -> DomainResult<Vec<Dish>> {
        let rows = sqlx::query_as::<_, DishRecord>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes ORDER BY dish_id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("list dishes", err))?;
        Ok(rows.into_iter().map(Dish::from).collect())
    }

    async fn list_by_user(&self, user_id: i64) -> DomainResult<Vec<Dish>> {
        let rows = sqlx::query_as::<_, DishRecord>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE user_id = $1 ORDER BY personal_dish_id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("list dishes by user", err))?;
        Ok(rows.into_iter().map(Dish::from).collect())
    }

    async fn create(&self, dish: &Dish) -> DomainResult<Dish> {
        // Concurrent creates for one user can compute the same per-user id
        // from their own snapshots; UNIQUE (user_id, personal_dish_id)
        // rejects the loser and the insert is retried with a fresh MAX.
        for _ in 0..3 {
            match self.try_create(dish).await {
                Err(DomainError::Conflict(_)) => continue,
                other => return other,
            }
        }
        Err(DomainError::Conflict(
            "create dish: could not assign a per-user dish id".to_string(),
        ))
    }

    async fn update(&self, dish: &Dish) -> DomainResult<Dish> {
        let record = sqlx::query_as::<_, DishRecord>(&format!(
            r#"
            UPDATE dishes SET
                personal_dish_id = $2,
                user_id = $3,
                storage_id = $4,
                title = $5,
                description = $6,
                created_date = $7,
                expire_date = $8,
                priority = $9,
                dish_type = $10,
                portions = $11,
                temp_match = $12
            WHERE dish_id = $1
            RETURNING {DISH_COLUMNS}
            "#
        ))
        .bind(dish.dish_id)
        .bind(dish.personal_dish_id)
        .bind(dish.user_id)
        .bind(dish.storage_id)
        .bind(&dish.title)
        .bind(&dish.description)
        .bind(&dish.created_date)
        .bind(&dish.expire_date)
        .bind(&dish.priority)
        .bind(&dish.dish_type)
        .bind(dish.portions)
        .bind(&dish.temp_match)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("update dish", err))?;
        record
            .map(Dish::from)
            .ok_or_else(|| DomainError::NotFound(format!("dish {} not found", dish.dish_id)))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM dishes WHERE dish_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_err("delete dish", err))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("dish {id} not found")));
        }
        Ok(())
    }
}

impl PostgresDishRepository {
    async fn try_create(&self, dish: &Dish) -> DomainResult<Dish> {
        // The per-user visible id is assigned inside the insert so it stays
        // monotonic per owner without a second round trip.
        let record = sqlx::query_as::<_, DishRecord>(&format!(
            r#"
            INSERT INTO dishes (
                personal_dish_id, user_id, storage_id, title, description,
                created_date, expire_date, priority, dish_type, portions, temp_match
            )
            SELECT COALESCE(MAX(personal_dish_id), 0) + 1, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
            FROM dishes WHERE user_id = $1
            RETURNING {DISH_COLUMNS}
            "#
        ))
        .bind(dish.user_id)
        .bind(dish.storage_id)
        .bind(&dish.title)
        .bind(&dish.description)
        .bind(&dish.created_date)
        .bind(&dish.expire_date)
        .bind(&dish.priority)
        .bind(&dish.dish_type)
        .bind(dish.portions)
        .bind(&dish.temp_match)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("create dish", err))?;
        Ok(record.into())
    }
}

#[derive(FromRow)]
struct StorageRecord {
    storage_id: i64,
    user_id: i64,
    title: String,
    description: String,
}

impl From<StorageRecord> for StorageUnit {
    fn from(record: StorageRecord) -> Self {
        StorageUnit {
            storage_id: record.storage_id,
            user_id: record.user_id,
            title: record.title,
            description: record.description,
        }
    }
}

#[derive(Clone)]
pub struct PostgresStorageRepository {
    pool: PgPool,
}

impl PostgresStorageRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl StorageRepository for PostgresStorageRepository {
    async fn get(&self, id: i64) -> DomainResult<StorageUnit> {
        let record = sqlx::query_as::<_, StorageRecord>(
            "SELECT storage_id, user_id, title, description FROM storages WHERE storage_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("get storage", err))?;
        record
            .map(StorageUnit::from)
            .ok_or_else(|| DomainError::NotFound(format!("storage {id} not found")))
    }

    async fn list_by_user(&self, user_id: i64) -> DomainResult<Vec<StorageUnit>> {
        let rows = sqlx::query_as::<_, StorageRecord>(
            "SELECT storage_id, user_id, title, description FROM storages \
             WHERE user_id = $1 ORDER BY storage_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("list storages by user", err))?;
        Ok(rows.into_iter().map(StorageUnit::from).collect())
    }

    async fn create(&self, storage: &StorageUnit) -> DomainResult<StorageUnit> {
        let record = sqlx::query_as::<_, StorageRecord>(
            r#"
            INSERT INTO storages (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING storage_id, user_id, title, description
            "#,
        )
        .bind(storage.user_id)
        .bind(&storage.title)
        .bind(&storage.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("create storage", err))?;
        Ok(record.into())
    }

    async fn update(&self, storage: &StorageUnit) -> DomainResult<StorageUnit> {
        let record = sqlx::query_as::<_, StorageRecord>(
            r#"
            UPDATE storages SET user_id = $2, title = $3, description = $4
            WHERE storage_id = $1
            RETURNING storage_id, user_id, title, description
            "#,
        )
        .bind(storage.storage_id)
        .bind(storage.user_id)
        .bind(&storage.title)
        .bind(&storage.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_sqlx_err("update storage", err))?;
        record
            .map(StorageUnit::from)
            .ok_or_else(|| DomainError::NotFound(format!("storage {} not found", storage.storage_id)))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM storages WHERE storage_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_err("delete storage", err))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("storage {id} not found")));
        }
        Ok(())
    }
}
