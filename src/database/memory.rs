use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Blog, BlogChanges, NewBlog, NewUser, User};
use super::{BlogStore, Store, StoreError, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    blogs: Vec<Blog>,
}

/// Process-local store for development and tests.
///
/// A single lock guards both tables so that cross-table writes (blog plus
/// owner back-reference) are never observed half-done.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate { field: "username" });
        }

        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
            blog_ids: Vec::new(),
            created_at: Utc::now(),
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.clone())
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        Ok(self.tables.read().await.blogs.clone())
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn create_blog(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let owner = tables
            .users
            .iter_mut()
            .find(|u| u.id == blog.user_id)
            .ok_or(StoreError::MissingReference("user"))?;

        let record = Blog {
            id: Uuid::new_v4(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user_id: blog.user_id,
            created_at: Utc::now(),
        };
        owner.blog_ids.push(record.id);
        tables.blogs.push(record.clone());
        Ok(record)
    }

    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> Result<Option<Blog>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(blog) = tables.blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        blog.title = changes.title;
        blog.author = changes.author;
        blog.url = changes.url;
        blog.likes = changes.likes;
        Ok(Some(blog.clone()))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.blogs.iter().position(|b| b.id == id) else {
            return Ok(false);
        };

        let removed = tables.blogs.remove(index);
        if let Some(owner) = tables.users.iter_mut().find(|u| u.id == removed.user_id) {
            owner.blog_ids.retain(|blog_id| *blog_id != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            name: None,
            password_hash: "hash".to_string(),
        }
    }

    fn new_blog(user_id: Uuid, title: &str) -> NewBlog {
        NewBlog {
            title: title.to_string(),
            author: "author".to_string(),
            url: "https://example.com".to_string(),
            likes: 0,
            user_id,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_username() {
        let store = MemoryStore::new();
        store.insert_user(new_user("root")).await.unwrap();
        let err = store.insert_user(new_user("root")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "username" }));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_and_delete_keep_back_reference_in_step() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("root")).await.unwrap();

        let first = store.create_blog(new_blog(user.id, "first")).await.unwrap();
        let second = store.create_blog(new_blog(user.id, "second")).await.unwrap();

        let owner = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(owner.blog_ids, vec![first.id, second.id]);

        assert!(store.delete_blog(first.id).await.unwrap());
        let owner = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(owner.blog_ids, vec![second.id]);

        assert!(!store.delete_blog(first.id).await.unwrap());
    }

    #[tokio::test]
    async fn create_requires_existing_owner() {
        let store = MemoryStore::new();
        let err = store.create_blog(new_blog(Uuid::new_v4(), "orphan")).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference("user")));
        assert!(store.list_blogs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_leaves_owner_untouched() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("root")).await.unwrap();
        let blog = store.create_blog(new_blog(user.id, "before")).await.unwrap();

        let updated = store
            .update_blog(
                blog.id,
                BlogChanges {
                    title: "after".to_string(),
                    author: blog.author.clone(),
                    url: blog.url.clone(),
                    likes: 7,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.likes, 7);
        assert_eq!(updated.user_id, user.id);
        assert!(store
            .update_blog(Uuid::new_v4(), BlogChanges {
                title: String::new(),
                author: String::new(),
                url: String::new(),
                likes: 0,
            })
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn concurrent_creates_by_one_owner_are_all_recorded() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let user = store.insert_user(new_user("root")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create_blog(new_blog(user.id, &format!("blog {i}"))).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let owner = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(owner.blog_ids.len(), 16);
        assert_eq!(store.list_blogs().await.unwrap().len(), 16);
    }
}
