use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user display settings. Created lazily the first time a profile is
/// asked for.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: u32,
    pub display_name: String,
    pub theme: String,
    pub currency: String,
    pub avatar_path: Option<String>,
}

impl UserProfile {
    pub fn new(user_id: u32, display_name: &str) -> Self {
        UserProfile {
            user_id,
            display_name: display_name.to_string(),
            theme: "light".to_string(),
            currency: "BRL".to_string(),
            avatar_path: None,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProfileFilter {
    pub user_id: Option<u32>,
}
