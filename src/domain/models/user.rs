use serde::{Deserialize, Serialize};

/// Layout of the persisted user creation timestamp (UTC, no offset stored).
pub const USER_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    /// Unique lookup key; exactly one row exists per distinct verified email.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub created_date: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Optional external linkage, mutable after creation.
    pub alexa_user_id: String,
    pub admin: bool,
    pub temp_match: String,
}
