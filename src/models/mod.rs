//! Request and Response models for the card API
//!
//! Query-string DTOs with their validation, and the JSON bodies returned by
//! the non-image endpoints.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    parse_ranked_entries, AtmQuery, AtmRequest, ProfileQuery, RankQuery, RankRequest, RankedEntry,
};
pub use responses::{CacheSummary, HealthResponse, ProfileResponse, StatsResponse};
