use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use uuid::Uuid;

use super::ServiceError;
use crate::auth::{password, TokenCodec};
use crate::database::models::{BlogSummary, NewUser, User};
use crate::database::{BlogStore, Store, StoreError, UserStore};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 3;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

/// User as listed by `GET /api/users`, blogs expanded
#[derive(Debug, Serialize)]
pub struct UserWithBlogs {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<BlogSummary>,
}

fn required_min_length<'a>(
    field: &str,
    value: Option<&'a str>,
    min: usize,
) -> Result<&'a str, ServiceError> {
    let value = value.ok_or_else(|| {
        ServiceError::validation(field, format!("`{}` is required", field))
    })?;

    if value.chars().count() < min {
        return Err(ServiceError::validation(
            field,
            format!(
                "`{}` (`{}`) is shorter than the minimum allowed length ({})",
                field,
                if field == "password" { "***" } else { value },
                min
            ),
        ));
    }
    Ok(value)
}

/// Create an account. The plaintext password is hashed before it reaches the store.
pub async fn signup(store: &dyn Store, request: SignupRequest) -> Result<User, ServiceError> {
    let username = required_min_length("username", request.username.as_deref(), MIN_USERNAME_LENGTH)?;
    let plaintext = required_min_length("password", request.password.as_deref(), MIN_PASSWORD_LENGTH)?;

    let password_hash = password::hash_password(plaintext)?;
    let new_user = NewUser {
        username: username.to_string(),
        name: request.name.filter(|n| !n.trim().is_empty()),
        password_hash,
    };

    let user = store.insert_user(new_user).await.map_err(|e| match e {
        StoreError::Duplicate { field } => {
            let detail = format!("expected `{}` to be unique", field);
            ServiceError::Validation {
                message: format!("User validation failed: {}: {}", field, detail),
                field_errors: HashMap::from([(field.to_string(), detail)]),
            }
        }
        other => other.into(),
    })?;

    tracing::info!("User '{}' registered ({})", user.username, user.id);
    Ok(user)
}

/// Hash checked against when the username is unknown
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| password::hash_password("login-timing-placeholder").ok())
        .as_deref()
}

/// Check credentials and issue a bearer token.
///
/// Unknown usernames and wrong passwords fail identically.
pub async fn login(
    store: &dyn Store,
    codec: &TokenCodec,
    request: LoginRequest,
) -> Result<LoginResponse, ServiceError> {
    let user = store.find_user_by_username(&request.username).await?;

    let user = match user {
        Some(user) if password::verify_password(&request.password, &user.password_hash) => user,
        found => {
            // Unknown usernames still pay for one argon2 verify
            if found.is_none() {
                if let Some(hash) = dummy_hash() {
                    password::verify_password(&request.password, hash);
                }
            }
            tracing::warn!("Failed login attempt for '{}'", request.username);
            return Err(ServiceError::InvalidCredentials);
        }
    };

    let token = codec.issue(user.id)?;
    tracing::info!("User '{}' logged in", user.username);

    Ok(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    })
}

/// Every user with the blogs their back-reference list points at
pub async fn list(store: &dyn Store) -> Result<Vec<UserWithBlogs>, ServiceError> {
    let users = store.list_users().await?;
    let blogs: HashMap<Uuid, BlogSummary> = store
        .list_blogs()
        .await?
        .iter()
        .map(|blog| (blog.id, BlogSummary::from(blog)))
        .collect();

    Ok(users
        .into_iter()
        .map(|user| UserWithBlogs {
            blogs: user.blog_ids.iter().filter_map(|id| blogs.get(id).cloned()).collect(),
            id: user.id,
            username: user.username,
            name: user.name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn signup_request(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: Some(username.to_string()),
            name: Some("Superuser".to_string()),
            password: Some(password.to_string()),
        }
    }

    fn message(err: ServiceError) -> String {
        match err {
            ServiceError::Validation { message, .. } => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn signup_hashes_password() {
        let store = MemoryStore::new();
        let user = signup(&store, signup_request("mluukkai", "salainen")).await.unwrap();
        assert_ne!(user.password_hash, "salainen");
        assert!(password::verify_password("salainen", &user.password_hash));

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "mluukkai");
    }

    #[tokio::test]
    async fn signup_rejects_short_username() {
        let store = MemoryStore::new();
        let err = signup(&store, signup_request("ab", "salainen")).await.unwrap_err();
        let msg = message(err);
        assert!(msg.contains("username"), "{msg}");
        assert!(msg.contains("shorter than the minimum allowed length (3)"), "{msg}");
    }

    #[tokio::test]
    async fn signup_rejects_short_or_missing_password() {
        let store = MemoryStore::new();
        let msg = message(signup(&store, signup_request("root", "pw")).await.unwrap_err());
        assert!(msg.contains("password"), "{msg}");
        assert!(!msg.contains("pw`"), "{msg}");

        let request = SignupRequest {
            username: Some("root".to_string()),
            name: None,
            password: None,
        };
        assert!(message(signup(&store, request).await.unwrap_err()).contains("`password` is required"));
    }

    #[tokio::test]
    async fn signup_rejects_taken_username() {
        let store = MemoryStore::new();
        signup(&store, signup_request("root", "sekret")).await.unwrap();
        let msg = message(signup(&store, signup_request("root", "salainen")).await.unwrap_err());
        assert!(msg.contains("`username` to be unique"), "{msg}");
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn login_issues_token_for_subject() {
        let store = MemoryStore::new();
        let codec = TokenCodec::new("test-secret", 1);
        let user = signup(&store, signup_request("root", "sekret")).await.unwrap();

        let response = login(
            &store,
            &codec,
            LoginRequest {
                username: "root".to_string(),
                password: "sekret".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.username, "root");
        assert_eq!(codec.verify(&response.token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn login_fails_identically_for_bad_password_and_unknown_user() {
        let store = MemoryStore::new();
        let codec = TokenCodec::new("test-secret", 1);
        signup(&store, signup_request("root", "sekret")).await.unwrap();

        for (username, password) in [("root", "wrong"), ("nobody", "sekret")] {
            let err = login(
                &store,
                &codec,
                LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidCredentials));
        }
    }

    #[test]
    fn unknown_user_path_verifies_against_a_real_hash() {
        let hash = dummy_hash().expect("dummy hash");
        assert!(hash.starts_with("$argon2"));
        assert!(!password::verify_password("sekret", hash));
        assert_eq!(dummy_hash(), Some(hash));
    }
}
