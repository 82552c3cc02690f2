use std::sync::Arc;

use chrono::Local;
use poem_openapi::{OpenApi, param::Path, payload::Json};
use uuid::Uuid;

use crate::{
    domain::models::{DISH_DATE_FORMAT, Dish, PORTIONS_NOT_SPECIFIED},
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        mappers::{map_dish, map_error},
        requests::DishUpsertDto,
        responses::DishDto,
        security::TokenAuth,
    },
};

#[derive(Clone)]
pub struct DishEndpoints {
    state: Arc<ApiState>,
}

impl DishEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }

    fn from_dto(request: DishUpsertDto) -> Dish {
        Dish {
            dish_id: 0,
            personal_dish_id: 0,
            user_id: 0,
            storage_id: request.storage_id,
            title: request.title,
            description: request.description,
            created_date: Local::now().naive_local().format(DISH_DATE_FORMAT).to_string(),
            expire_date: request.expire_date,
            priority: request.priority,
            dish_type: request.dish_type,
            portions: request.portions.unwrap_or(PORTIONS_NOT_SPECIFIED),
            temp_match: Uuid::new_v4().to_string(),
        }
    }
}

#[OpenApi]
impl DishEndpoints {
    #[oai(path = "/dishes", method = "get", tag = EndpointsTags::Dishes)]
    pub async fn list(&self, auth: TokenAuth) -> poem::Result<Json<Vec<DishDto>>> {
        let user = auth.resolve(&self.state).await?;
        let dishes = self
            .state
            .dish_service
            .list(user.user_id)
            .await
            .map_err(map_error)?;
        Ok(Json(dishes.iter().map(map_dish).collect()))
    }

    /// Dishes of the calling user already past their stored expiry.
    #[oai(path = "/dishes/expired", method = "get", tag = EndpointsTags::Dishes)]
    pub async fn expired(&self, auth: TokenAuth) -> poem::Result<Json<Vec<DishDto>>> {
        let user = auth.resolve(&self.state).await?;
        let now = Local::now().naive_local();
        let dishes = self
            .state
            .dish_service
            .expired(user.user_id, now)
            .await
            .map_err(map_error)?;
        Ok(Json(dishes.iter().map(map_dish).collect()))
    }

    #[oai(path = "/dishes/:id", method = "get", tag = EndpointsTags::Dishes)]
    pub async fn get(&self, auth: TokenAuth, id: Path<i64>) -> poem::Result<Json<DishDto>> {
        let user = auth.resolve(&self.state).await?;
        let dish = self
            .state
            .dish_service
            .get(user.user_id, id.0)
            .await
            .map_err(map_error)?;
        Ok(Json(map_dish(&dish)))
    }

    #[oai(path = "/dishes", method = "post", tag = EndpointsTags::Dishes)]
    pub async fn create(
        &self,
        auth: TokenAuth,
        request: Json<DishUpsertDto>,
    ) -> poem::Result<Json<DishDto>> {
        let user = auth.resolve(&self.state).await?;
        let dish = Self::from_dto(request.0);
        let created = self
            .state
            .dish_service
            .create(user.user_id, dish)
            .await
            .map_err(map_error)?;
        Ok(Json(map_dish(&created)))
    }

    #[oai(path = "/dishes/:id", method = "put", tag = EndpointsTags::Dishes)]
    pub async fn update(
        &self,
        auth: TokenAuth,
        id: Path<i64>,
        request: Json<DishUpsertDto>,
    ) -> poem::Result<Json<DishDto>> {
        let user = auth.resolve(&self.state).await?;
        let existing = self
            .state
            .dish_service
            .get(user.user_id, id.0)
            .await
            .map_err(map_error)?;
        let mut dish = Self::from_dto(request.0);
        dish.dish_id = existing.dish_id;
        dish.created_date = existing.created_date;
        dish.temp_match = existing.temp_match;
        let updated = self
            .state
            .dish_service
            .update(user.user_id, dish)
            .await
            .map_err(map_error)?;
        Ok(Json(map_dish(&updated)))
    }

    #[oai(path = "/dishes/:id", method = "delete", tag = EndpointsTags::Dishes)]
    pub async fn delete(&self, auth: TokenAuth, id: Path<i64>) -> poem::Result<()> {
        let user = auth.resolve(&self.state).await?;
        self.state
            .dish_service
            .delete(user.user_id, id.0)
            .await
            .map_err(map_error)
    }
}
