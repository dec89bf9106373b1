use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub company_id: i64,
    pub email: String,
    pub name: String,
    pub is_active: bool,
}
