use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Account record. `password_hash` never leaves the process.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Back-reference to owned blogs, in creation order
    #[serde(rename = "blogs")]
    pub blog_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Validated signup input, ready to persist
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// Owner summary embedded in blog listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}
