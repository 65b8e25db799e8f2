// middleware/mod.rs - Request pipeline pieces shared by all routes
//
// Auth is a two-stage chain:
//   1. token::extract_bearer_token   (layer on every route, never rejects)
//   2. identity::Authenticated       (extractor on mutating handlers, short-circuits)

pub mod identity;
pub mod response;
pub mod token;

pub use identity::{resolve_identity, Authenticated};
pub use response::{ApiResponse, ApiResult};
pub use token::{extract_bearer_token, BearerToken};
