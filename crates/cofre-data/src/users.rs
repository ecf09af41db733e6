use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub email: String,
    pub password_salt: String,
    pub password_hash: String,
    pub created_at: NaiveDate,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserFilter {
    pub id: Option<u32>,
    pub email: Option<String>,
}

/// A signed-in user. The token is handed to the client and resolves back
/// to the user on every call.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: u32,
    pub created_at: NaiveDate,
}
