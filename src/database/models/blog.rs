use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    /// Owner id, fixed at creation
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub user_id: Uuid,
}

/// Replacement values for the mutable blog fields
#[derive(Debug, Clone)]
pub struct BlogChanges {
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
}

/// Blog as shown in listings, with the owner expanded
#[derive(Debug, Clone, Serialize)]
pub struct BlogWithOwner {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    pub user: Option<UserSummary>,
}

impl BlogWithOwner {
    pub fn new(blog: Blog, owner: Option<UserSummary>) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user: owner,
        }
    }
}

/// Blog as shown under its owner in user listings
#[derive(Debug, Clone, Serialize)]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
}

impl From<&Blog> for BlogSummary {
    fn from(blog: &Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
        }
    }
}
