mod auth;
mod cache;

pub use auth::TokenManager;
pub use cache::{AccountCache, AccountRecord, CachedUser};
