use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageUnit {
    pub storage_id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
}
