use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::StorageUnit;
use crate::domain::repositories::StorageRepository;

/// Storage-unit CRUD scoped to the calling user.
pub struct StorageService {
    storages: Arc<dyn StorageRepository>,
}

impl StorageService {
    pub fn new(storages: Arc<dyn StorageRepository>) -> Self {
        Self { storages }
    }

    pub async fn get(&self, user_id: i64, id: i64) -> DomainResult<StorageUnit> {
        let storage = self.storages.get(id).await.map_err(|err| match err {
            DomainError::NotFound(_) => err,
            _ => DomainError::Internal(format!("storage service: could not get storage {id}")),
        })?;
        if storage.user_id != user_id {
            return Err(DomainError::NotFound(format!("storage {id} not found")));
        }
        Ok(storage)
    }

    pub async fn list(&self, user_id: i64) -> DomainResult<Vec<StorageUnit>> {
        let storages = self.storages.list_by_user(user_id).await.map_err(|_| {
            DomainError::Internal("storage service: could not list storages".to_string())
        })?;
        if storages.is_empty() {
            return Err(DomainError::NotFound("no storages".to_string()));
        }
        Ok(storages)
    }

    pub async fn create(&self, user_id: i64, mut storage: StorageUnit) -> DomainResult<StorageUnit> {
        storage.user_id = user_id;
        self.storages.create(&storage).await.map_err(|_| {
            DomainError::Internal("storage service: could not create storage".to_string())
        })
    }

    pub async fn update(&self, user_id: i64, mut storage: StorageUnit) -> DomainResult<StorageUnit> {
        self.get(user_id, storage.storage_id).await?;
        storage.user_id = user_id;
        self.storages.update(&storage).await.map_err(|err| match err {
            DomainError::NotFound(_) => err,
            _ => DomainError::Internal("storage service: could not update storage".to_string()),
        })
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> DomainResult<()> {
        self.get(user_id, id).await?;
        self.storages.delete(id).await.map_err(|err| match err {
            DomainError::NotFound(_) => err,
            _ => DomainError::Internal("storage service: could not delete storage".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::in_memory::InMemoryStorageRepository;

    fn storage(title: &str) -> StorageUnit {
        StorageUnit {
            storage_id: 0,
            user_id: 0,
            title: title.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let svc = StorageService::new(Arc::new(InMemoryStorageRepository::new()));

        let created = svc.create(7, storage("Fridge")).await.unwrap();
        assert!(created.storage_id > 0);
        assert_eq!(created.user_id, 7);

        let mut renamed = created.clone();
        renamed.title = "Garage fridge".to_string();
        let updated = svc.update(7, renamed).await.unwrap();
        assert_eq!(updated.title, "Garage fridge");

        let listed = svc.list(7).await.unwrap();
        assert_eq!(listed.len(), 1);

        svc.delete(7, created.storage_id).await.unwrap();
        assert!(svc.get(7, created.storage_id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn empty_result_set_surfaces_not_found() {
        let svc = StorageService::new(Arc::new(InMemoryStorageRepository::new()));
        let err = svc.list(7).await.unwrap_err();
        match err {
            DomainError::NotFound(msg) => assert_eq!(msg, "no storages"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn foreign_storage_reads_as_absent() {
        let svc = StorageService::new(Arc::new(InMemoryStorageRepository::new()));
        let created = svc.create(7, storage("Fridge")).await.unwrap();
        assert!(svc.get(8, created.storage_id).await.unwrap_err().is_not_found());
    }
}
