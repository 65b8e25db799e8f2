// handlers/protected/mod.rs - Handlers that require a resolved identity
//
// Each handler takes `Authenticated` as an argument, so identity resolution
// runs (and may reject with 401) before any handler body executes.
// Ownership of an existing blog is then checked by the service layer.

pub mod blogs;

pub use blogs::{create as blog_create, delete as blog_delete, update as blog_update};
