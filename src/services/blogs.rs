use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::ServiceError;
use crate::database::models::{Blog, BlogChanges, BlogWithOwner, NewBlog, User, UserSummary};
use crate::database::{BlogStore, Store, StoreError, UserStore};
use crate::types::Mutation;

/// Client-supplied blog fields for create and update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl BlogInput {
    fn has_title_or_url(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.title) || filled(&self.url)
    }
}

fn check_likes(likes: Option<i64>) -> Result<(), ServiceError> {
    match likes {
        Some(n) if n < 0 => Err(ServiceError::validation("likes", "`likes` must not be negative")),
        _ => Ok(()),
    }
}

/// Ownership guard shared by every mutation on an existing blog
pub fn ensure_owner(blog: &Blog, caller: &User, mutation: Mutation) -> Result<(), ServiceError> {
    if blog.user_id == caller.id {
        return Ok(());
    }

    tracing::warn!(
        "Ownership check failed: user '{}' ({}) tried to {} blog {} owned by {}",
        caller.username, caller.id, mutation, blog.id, blog.user_id
    );
    Err(ServiceError::Forbidden(format!(
        "only the creator of a blog may {} it",
        mutation
    )))
}

/// All blogs, each with its owner summarized
pub async fn list(store: &dyn Store) -> Result<Vec<BlogWithOwner>, ServiceError> {
    let blogs = store.list_blogs().await?;
    let owners: HashMap<Uuid, UserSummary> = store
        .list_users()
        .await?
        .iter()
        .map(|user| (user.id, UserSummary::from(user)))
        .collect();

    Ok(blogs
        .into_iter()
        .map(|blog| {
            let owner = owners.get(&blog.user_id).cloned();
            BlogWithOwner::new(blog, owner)
        })
        .collect())
}

pub async fn get(store: &dyn Store, id: Uuid) -> Result<Blog, ServiceError> {
    store.find_blog(id).await?.ok_or(ServiceError::NotFound("blog"))
}

/// Create a blog owned by `owner`.
///
/// Needs a non-empty `title` or `url`; `likes` defaults to 0. The store
/// appends the new id to the owner's back-reference list in the same write.
pub async fn create(store: &dyn Store, owner: &User, input: BlogInput) -> Result<Blog, ServiceError> {
    if !input.has_title_or_url() {
        return Err(ServiceError::Validation {
            message: "blog validation failed: `title` or `url` is required".to_string(),
            field_errors: HashMap::from([
                ("title".to_string(), "required when `url` is empty".to_string()),
                ("url".to_string(), "required when `title` is empty".to_string()),
            ]),
        });
    }
    check_likes(input.likes)?;

    let new_blog = NewBlog {
        title: input.title.unwrap_or_default(),
        author: input.author.unwrap_or_default(),
        url: input.url.unwrap_or_default(),
        likes: input.likes.unwrap_or(0),
        user_id: owner.id,
    };

    let blog = store.create_blog(new_blog).await.map_err(|e| match e {
        // Owner vanished between identity resolution and the write
        StoreError::MissingReference(_) => ServiceError::InvalidIdentity,
        other => other.into(),
    })?;

    tracing::info!("Blog {} created by '{}'", blog.id, owner.username);
    Ok(blog)
}

/// Replace the mutable fields of a blog the caller owns.
///
/// Fields absent from `input` keep their stored value; the owner never changes.
pub async fn update(
    store: &dyn Store,
    caller: &User,
    id: Uuid,
    input: BlogInput,
) -> Result<Blog, ServiceError> {
    let existing = get(store, id).await?;
    ensure_owner(&existing, caller, Mutation::Update)?;
    check_likes(input.likes)?;

    let changes = BlogChanges {
        title: input.title.unwrap_or(existing.title),
        author: input.author.unwrap_or(existing.author),
        url: input.url.unwrap_or(existing.url),
        likes: input.likes.unwrap_or(existing.likes),
    };

    store
        .update_blog(id, changes)
        .await?
        .ok_or(ServiceError::NotFound("blog"))
}

/// Delete a blog the caller owns. Existence is checked before ownership.
pub async fn delete(store: &dyn Store, caller: &User, id: Uuid) -> Result<(), ServiceError> {
    let existing = get(store, id).await?;
    ensure_owner(&existing, caller, Mutation::Delete)?;

    if !store.delete_blog(id).await? {
        return Err(ServiceError::NotFound("blog"));
    }

    tracing::info!("Blog {} deleted by '{}'", id, caller.username);
    Ok(())
}
