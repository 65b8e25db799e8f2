use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use super::models::{Blog, BlogChanges, NewBlog, NewUser, User};
use super::{BlogStore, Store, StoreError, UserStore};

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        name          TEXT,
        password_hash TEXT NOT NULL,
        blog_ids      UUID[] NOT NULL DEFAULT '{}',
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS blogs (
        id         UUID PRIMARY KEY,
        title      TEXT NOT NULL DEFAULT '',
        author     TEXT NOT NULL DEFAULT '',
        url        TEXT NOT NULL DEFAULT '',
        likes      BIGINT NOT NULL DEFAULT 0 CHECK (likes >= 0),
        user_id    UUID NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

const USER_COLUMNS: &str = "id, username, name, password_hash, blog_ids, created_at";
const BLOG_COLUMNS: &str = "id, title, author, url, likes, user_id, created_at";

/// Postgres-backed store; cross-table writes run inside one transaction
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("Created database pool (max {} connections)", max_connections);
        Ok(Self { pool })
    }

    /// Create tables when missing
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, username, name, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.name)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate { field: "username" }
                } else {
                    e.into()
                }
            })
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        let sql = format!("SELECT {} FROM blogs ORDER BY created_at, id", BLOG_COLUMNS);
        Ok(sqlx::query_as::<_, Blog>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let sql = format!("SELECT {} FROM blogs WHERE id = $1", BLOG_COLUMNS);
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_blog(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::new_v4();

        // Row lock on the owner serializes concurrent appends to blog_ids
        let appended = sqlx::query("UPDATE users SET blog_ids = array_append(blog_ids, $1) WHERE id = $2")
            .bind(id)
            .bind(blog.user_id)
            .execute(&mut *tx)
            .await?;
        if appended.rows_affected() == 0 {
            return Err(StoreError::MissingReference("user"));
        }

        let sql = format!(
            "INSERT INTO blogs (id, title, author, url, likes, user_id) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            BLOG_COLUMNS
        );
        let created = sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .bind(&blog.title)
            .bind(&blog.author)
            .bind(&blog.url)
            .bind(blog.likes)
            .bind(blog.user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> Result<Option<Blog>, StoreError> {
        let sql = format!(
            "UPDATE blogs SET title = $2, author = $3, url = $4, likes = $5 WHERE id = $1 RETURNING {}",
            BLOG_COLUMNS
        );
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.author)
            .bind(&changes.url)
            .bind(changes.likes)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<Uuid> = sqlx::query_scalar("DELETE FROM blogs WHERE id = $1 RETURNING user_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(owner) = owner else {
            return Ok(false);
        };

        sqlx::query("UPDATE users SET blog_ids = array_remove(blog_ids, $1) WHERE id = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
