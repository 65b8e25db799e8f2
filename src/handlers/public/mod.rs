// handlers/public/mod.rs - Public handlers (no identity resolution)
//
// Reads stay anonymous. Login and signup are the token acquisition path.

pub mod blogs;
pub mod login;
pub mod system;
pub mod users;

pub use blogs::{list as blogs_list, show as blog_show, stats as blogs_stats};
pub use login::login_post;
pub use system::{health, root};
pub use users::{list as users_list, register as user_register};
