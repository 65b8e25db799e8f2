pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{StoreBackend, StoreConfig};
use models::{Blog, BlogChanges, NewBlog, NewUser, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    /// A unique field already holds this value
    #[error("expected `{field}` to be unique")]
    Duplicate { field: &'static str },

    /// A referenced record does not exist
    #[error("{0} not found")]
    MissingReference(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Credential side of the document store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user, failing with [`StoreError::Duplicate`] on a taken username
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}

/// Blog side of the document store.
///
/// `create_blog` and `delete_blog` keep the owner's back-reference list in
/// step with the blog table within the same write.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError>;

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;

    /// Insert the blog and append its id to the owner's `blog_ids`
    async fn create_blog(&self, blog: NewBlog) -> Result<Blog, StoreError>;

    /// Replace mutable fields; `None` if the blog does not exist
    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> Result<Option<Blog>, StoreError>;

    /// Remove the blog and prune it from the owner's `blog_ids`; `false` if absent
    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait Store: UserStore + BlogStore {
    /// Cheap connectivity probe used by `/health`
    async fn health_check(&self) -> Result<(), StoreError>;
}

pub type DynStore = Arc<dyn Store>;

/// Open the store selected by configuration
pub async fn connect(config: &StoreConfig) -> Result<DynStore, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;
            let store = PgStore::connect(url, config.max_connections).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
