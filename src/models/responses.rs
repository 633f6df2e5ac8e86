//! Response DTOs for the JSON endpoints

use serde::Serialize;

use crate::cache::CacheStats;
use crate::users::UserInfo;

/// Body of `GET /api/perfil?json=true`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserInfo,
    pub coins: String,
    pub reps: String,
    pub status: String,
    pub about_me: String,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub users: CacheSummary,
    pub images: CacheSummary,
    pub rank: CacheSummary,
}

/// Counters of one cache plus its hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSummary {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Served from cache or a shared fetch, over all lookups
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheSummary {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
