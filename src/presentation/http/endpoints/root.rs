use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::services::{
    dishes::DishService, storages::StorageService, users::UserService,
};

pub struct ApiState {
    pub user_service: Arc<UserService>,
    pub dish_service: Arc<DishService>,
    pub storage_service: Arc<StorageService>,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Dishes,
    Storages,
    Users,
}
