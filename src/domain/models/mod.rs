pub mod dish;
pub mod storage;
pub mod user;

pub use dish::{DISH_DATE_FORMAT, Dish, PORTIONS_NOT_SPECIFIED};
pub use storage::StorageUnit;
pub use user::{USER_DATE_FORMAT, User};
