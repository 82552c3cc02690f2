pub mod dishes;
pub mod health;
pub mod root;
pub mod storages;
pub mod users;
