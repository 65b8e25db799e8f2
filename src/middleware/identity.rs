use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::token::BearerToken;
use crate::auth::TokenCodec;
use crate::database::models::User;
use crate::database::{Store, UserStore};
use crate::error::ApiError;
use crate::services::ServiceError;
use crate::state::AppState;

/// Second stage of the auth chain: turn the candidate token into a stored user.
///
/// - no token: `Unauthenticated`
/// - token fails verification: `Unauthenticated`
/// - subject has no user record: `InvalidIdentity`
pub async fn resolve_identity(
    candidate: Option<&str>,
    codec: &TokenCodec,
    store: &dyn Store,
) -> Result<User, ServiceError> {
    let token = candidate
        .filter(|t| !t.is_empty())
        .ok_or(ServiceError::Unauthenticated("token missing"))?;

    let user_id = codec
        .verify(token)
        .map_err(|_| ServiceError::Unauthenticated("token invalid"))?;

    let user = store.find_user(user_id).await?.ok_or_else(|| {
        tracing::warn!("Identity resolution failed: no user for token subject {}", user_id);
        ServiceError::InvalidIdentity
    })?;

    tracing::debug!("Identity resolved: {} ({})", user.username, user.id);
    Ok(user)
}

/// Resolved caller identity, taken as an explicit handler argument.
///
/// Handlers that accept this never run for unauthenticated requests; the
/// rejection is the mapped [`ApiError`].
#[derive(Clone, Debug)]
pub struct Authenticated(pub User);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let candidate = parts
            .extensions
            .get::<BearerToken>()
            .and_then(BearerToken::as_deref);

        let user = resolve_identity(candidate, &state.codec, state.store()).await?;
        Ok(Authenticated(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewUser;
    use crate::database::MemoryStore;
    use uuid::Uuid;

    async fn setup() -> (MemoryStore, TokenCodec, User) {
        let store = MemoryStore::new();
        let user = store
            .insert_user(NewUser {
                username: "root".to_string(),
                name: None,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        (store, TokenCodec::new("test-secret", 1), user)
    }

    #[tokio::test]
    async fn valid_token_resolves_to_its_user() {
        let (store, codec, user) = setup().await;
        let token = codec.issue(user.id).unwrap();
        let resolved = resolve_identity(Some(&token), &codec, &store).await.unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.username, "root");
    }

    #[tokio::test]
    async fn missing_or_empty_token_is_unauthenticated() {
        let (store, codec, _) = setup().await;
        for candidate in [None, Some("")] {
            let err = resolve_identity(candidate, &codec, &store).await.unwrap_err();
            assert!(matches!(err, ServiceError::Unauthenticated("token missing")));
        }
    }

    #[tokio::test]
    async fn bad_token_is_unauthenticated() {
        let (store, codec, user) = setup().await;
        let forged = TokenCodec::new("other-secret", 1).issue(user.id).unwrap();
        let err = resolve_identity(Some(&forged), &codec, &store).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated("token invalid")));
    }

    #[tokio::test]
    async fn unknown_subject_is_invalid_identity() {
        let (store, codec, _) = setup().await;
        let token = codec.issue(Uuid::new_v4()).unwrap();
        let err = resolve_identity(Some(&token), &codec, &store).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidIdentity));
    }
}
