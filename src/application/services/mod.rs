pub mod dishes;
pub mod identity;
pub mod storages;
pub mod users;
