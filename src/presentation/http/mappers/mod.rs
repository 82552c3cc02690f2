use poem::http::StatusCode;
use tracing::error;

use crate::{
    domain::errors::DomainError,
    domain::models::{Dish, StorageUnit, User},
    presentation::http::responses::{DishDto, StorageDto, UserDto},
};

pub fn map_dish(dish: &Dish) -> DishDto {
    DishDto {
        dish_id: dish.dish_id,
        personal_dish_id: dish.personal_dish_id,
        storage_id: dish.storage_id,
        title: dish.title.clone(),
        description: dish.description.clone(),
        created_date: dish.created_date.clone(),
        expire_date: dish.expire_date.clone(),
        priority: dish.priority.clone(),
        dish_type: dish.dish_type.clone(),
        portions: dish.portions,
    }
}

pub fn map_storage(storage: &StorageUnit) -> StorageDto {
    StorageDto {
        storage_id: storage.storage_id,
        title: storage.title.clone(),
        description: storage.description.clone(),
    }
}

pub fn map_user(user: &User) -> UserDto {
    UserDto {
        user_id: user.user_id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        full_name: user.full_name.clone(),
        created_date: user.created_date.clone(),
        alexa_user_id: user.alexa_user_id.clone(),
        admin: user.admin,
    }
}

/// Opaque failures keep their detail in the server log; the response body
/// carries only a generic message so store and provider internals never
/// reach clients.
pub fn map_error(err: DomainError) -> poem::Error {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match &err {
        DomainError::Internal(detail) => {
            error!(%detail, "internal error");
            poem::Error::from_string("internal error", status)
        }
        DomainError::Canceled(detail) => {
            error!(%detail, "request deadline exceeded");
            poem::Error::from_string("request timed out", status)
        }
        _ => poem::Error::from_string(err.to_string(), status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_detail_stays_out_of_the_response() {
        let err = map_error(DomainError::Internal(
            "get user: connection to db://secret-host refused".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "internal error");
    }

    #[test]
    fn canceled_maps_to_a_generic_timeout_body() {
        let err = map_error(DomainError::Canceled(
            "external call exceeded the configured deadline".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.to_string(), "request timed out");
    }

    #[test]
    fn client_correctable_errors_keep_their_message() {
        let err = map_error(DomainError::BadRequest(
            "not authorized, unverified email".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("unverified email"));

        let err = map_error(DomainError::NotFound("no dishes".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("no dishes"));
    }
}
