//! Nano API - image-generation service for Discord-style cards
//!
//! Renders profile cards, leaderboard podiums and ATM receipts. User records
//! and decoded images sit behind TTL caches that coalesce concurrent fetches.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod images;
pub mod models;
pub mod render;
pub mod tasks;
pub mod users;

pub use api::{create_router, AppState};
pub use cache::ResourceCache;
pub use config::Config;
pub use error::{AppError, Result};
pub use tasks::{spawn_sweep_task, SweepHandle};
