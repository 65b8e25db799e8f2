pub mod blog;
pub mod user;

pub use blog::{Blog, BlogChanges, BlogSummary, BlogWithOwner, NewBlog};
pub use user::{NewUser, User, UserSummary};
