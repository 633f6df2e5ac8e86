//! Cache Module
//!
//! In-memory TTL caching with request coalescing, shared by the user-info
//! resolver, the image loader, and the rendered podium images.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::ResourceCache;
