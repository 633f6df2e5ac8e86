//! Users Module
//!
//! Resolves opaque user ids to sanitized, cached [`UserInfo`] records.

mod client;
mod model;
mod resolver;

pub use client::{DiscordClient, UserDirectory};
pub use model::{avatar_url, DiscordUser, UserInfo};
pub use resolver::{validate_user_id, UserResolver};
