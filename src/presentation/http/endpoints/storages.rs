use std::sync::Arc;

use poem_openapi::{OpenApi, param::Path, payload::Json};

use crate::{
    domain::models::StorageUnit,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        mappers::{map_error, map_storage},
        requests::StorageUpsertDto,
        responses::StorageDto,
        security::TokenAuth,
    },
};

#[derive(Clone)]
pub struct StorageEndpoints {
    state: Arc<ApiState>,
}

impl StorageEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl StorageEndpoints {
    #[oai(path = "/storages", method = "get", tag = EndpointsTags::Storages)]
    pub async fn list(&self, auth: TokenAuth) -> poem::Result<Json<Vec<StorageDto>>> {
        let user = auth.resolve(&self.state).await?;
        let storages = self
            .state
            .storage_service
            .list(user.user_id)
            .await
            .map_err(map_error)?;
        Ok(Json(storages.iter().map(map_storage).collect()))
    }

    #[oai(path = "/storages/:id", method = "get", tag = EndpointsTags::Storages)]
    pub async fn get(&self, auth: TokenAuth, id: Path<i64>) -> poem::Result<Json<StorageDto>> {
        let user = auth.resolve(&self.state).await?;
        let storage = self
            .state
            .storage_service
            .get(user.user_id, id.0)
            .await
            .map_err(map_error)?;
        Ok(Json(map_storage(&storage)))
    }

    #[oai(path = "/storages", method = "post", tag = EndpointsTags::Storages)]
    pub async fn create(
        &self,
        auth: TokenAuth,
        request: Json<StorageUpsertDto>,
    ) -> poem::Result<Json<StorageDto>> {
        let user = auth.resolve(&self.state).await?;
        let storage = StorageUnit {
            storage_id: 0,
            user_id: 0,
            title: request.0.title,
            description: request.0.description,
        };
        let created = self
            .state
            .storage_service
            .create(user.user_id, storage)
            .await
            .map_err(map_error)?;
        Ok(Json(map_storage(&created)))
    }

    #[oai(path = "/storages/:id", method = "put", tag = EndpointsTags::Storages)]
    pub async fn update(
        &self,
        auth: TokenAuth,
        id: Path<i64>,
        request: Json<StorageUpsertDto>,
    ) -> poem::Result<Json<StorageDto>> {
        let user = auth.resolve(&self.state).await?;
        let storage = StorageUnit {
            storage_id: id.0,
            user_id: 0,
            title: request.0.title,
            description: request.0.description,
        };
        let updated = self
            .state
            .storage_service
            .update(user.user_id, storage)
            .await
            .map_err(map_error)?;
        Ok(Json(map_storage(&updated)))
    }

    #[oai(path = "/storages/:id", method = "delete", tag = EndpointsTags::Storages)]
    pub async fn delete(&self, auth: TokenAuth, id: Path<i64>) -> poem::Result<()> {
        let user = auth.resolve(&self.state).await?;
        self.state
            .storage_service
            .delete(user.user_id, id.0)
            .await
            .map_err(map_error)
    }
}
