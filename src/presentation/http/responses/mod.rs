use poem_openapi::Object;

#[derive(Object)]
pub struct DishDto {
    pub dish_id: i64,
    pub personal_dish_id: i64,
    pub storage_id: i64,
    pub title: String,
    pub description: String,
    pub created_date: String,
    pub expire_date: String,
    pub priority: String,
    pub dish_type: String,
    pub portions: i32,
}

#[derive(Object)]
pub struct StorageDto {
    pub storage_id: i64,
    pub title: String,
    pub description: String,
}

/// Client-safe projection of the user row; credentials and correlation tokens
/// never leave the server.
#[derive(Object)]
pub struct UserDto {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub created_date: String,
    pub alexa_user_id: String,
    pub admin: bool,
}
