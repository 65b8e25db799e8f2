use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

const BEARER_PREFIX: &str = "bearer ";

/// Candidate bearer token for the current request, unverified.
///
/// `None` when the header is absent or uses another scheme; only routes that
/// resolve an identity treat that as an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// First stage of the auth chain: copy the bearer token into request extensions.
/// Never rejects.
pub async fn extract_bearer_token(mut request: Request, next: Next) -> Response {
    let token = bearer_from_headers(request.headers());
    request.extensions_mut().insert(BearerToken(token));

    next.run(request).await
}

/// Pull the token out of `Authorization: bearer <token>`, scheme case-insensitive
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;

    let scheme = auth_str.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }

    let token = auth_str.get(BEARER_PREFIX.len()..)?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
