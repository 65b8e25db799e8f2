use serde::Serialize;

use super::ServiceError;
use crate::database::models::{Blog, BlogSummary};
use crate::database::{BlogStore, Store};

#[derive(Debug, Serialize)]
pub struct FavoriteBlog {
    #[serde(flatten)]
    pub blog: BlogSummary,
    pub likes: i64,
}

#[derive(Debug, Serialize)]
pub struct BlogStats {
    pub count: usize,
    pub total_likes: i64,
    pub favorite: Option<FavoriteBlog>,
}

/// Sum of likes, saturating at `i64::MAX`
pub fn total_likes(blogs: &[Blog]) -> i64 {
    blogs.iter().fold(0i64, |acc, b| acc.saturating_add(b.likes))
}

/// Most-liked blog; the earliest one wins a tie
pub fn favorite_blog(blogs: &[Blog]) -> Option<&Blog> {
    blogs.iter().fold(None, |best: Option<&Blog>, blog| match best {
        Some(current) if current.likes >= blog.likes => Some(current),
        _ => Some(blog),
    })
}

pub async fn summarize(store: &dyn Store) -> Result<BlogStats, ServiceError> {
    let blogs = store.list_blogs().await?;

    Ok(BlogStats {
        count: blogs.len(),
        total_likes: total_likes(&blogs),
        favorite: favorite_blog(&blogs).map(|blog| FavoriteBlog {
            blog: BlogSummary::from(blog),
            likes: blog.likes,
        }),
    })
}
