use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod password;

/// Upper bound on configured token lifetime (ten years)
pub const MAX_TOKEN_LIFETIME_HOURS: u64 = 24 * 365 * 10;

/// JWT claims carried by every bearer token: the subject plus expiry metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Covers bad signatures, malformed tokens, expiry and unusable subjects alike
    #[error("invalid token")]
    InvalidToken,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// Signs and verifies bearer tokens with a shared HMAC secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, expiry_hours: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: Duration::hours(expiry_hours.min(MAX_TOKEN_LIFETIME_HOURS) as i64),
        }
    }

    /// Issue a signed token whose subject is `user_id`
    pub fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.sign(&Claims::new(user_id, self.lifetime))
    }

    /// Verify a token and return its subject.
    ///
    /// Every failure collapses into [`AuthError::InvalidToken`] so callers
    /// cannot tell a forged signature from garbage input.
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }
}
