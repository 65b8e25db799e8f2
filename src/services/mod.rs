pub mod blogs;
pub mod stats;
pub mod users;

use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::database::StoreError;

/// Failure kinds produced by the blog and account operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing, malformed or unverifiable bearer token
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Token verified but its subject no longer resolves to a user
    #[error("token subject does not match any user")]
    InvalidIdentity,

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("malformatted id")]
    MalformedId,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        ServiceError::Validation { message, field_errors }
    }
}

/// Parse a path identifier, rejecting anything that is not a store key
pub fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::MalformedId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_uuid_and_rejects_garbage() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("5a3d5da59070081a82a3445"), Err(ServiceError::MalformedId)));
        assert!(matches!(parse_id(""), Err(ServiceError::MalformedId)));
    }

    #[test]
    fn validation_carries_field_error() {
        match ServiceError::validation("title", "title or url is required") {
            ServiceError::Validation { message, field_errors } => {
                assert_eq!(message, "title or url is required");
                assert_eq!(field_errors.get("title").map(String::as_str), Some("title or url is required"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
