//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Primary name of the bot token variable.
pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
/// Name the token was read from by the legacy deployment.
pub const LEGACY_TOKEN_VAR: &str = "Btoken";

/// Server configuration parameters.
///
/// Everything except the bot token has a sensible default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token sent to the user directory
    pub discord_token: String,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the user directory REST API
    pub discord_api_base: String,
    /// Base URL avatar links are built from
    pub discord_cdn_base: String,
    /// TTL for resolved user records
    pub user_cache_ttl: Duration,
    /// TTL for decoded images
    pub image_cache_ttl: Duration,
    /// TTL for rendered podium images
    pub rank_cache_ttl: Duration,
    /// Sweep period for the user cache
    pub user_sweep_interval: Duration,
    /// Sweep period for the image cache
    pub image_sweep_interval: Duration,
    /// Sweep period for the rendered podium cache
    pub rank_sweep_interval: Duration,
    /// Courtesy delay before each distinct user fetch
    pub user_fetch_delay: Duration,
    /// Timeout applied to every outbound call
    pub upstream_timeout: Duration,
    /// Root directory of bundled assets (fonts, icons, default images)
    pub assets_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DISCORD_TOKEN` (or `Btoken`) - Bot token, required
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `DISCORD_API_BASE` - default `https://discord.com/api/v10`
    /// - `DISCORD_CDN_BASE` - default `https://cdn.discordapp.com`
    /// - `USER_CACHE_TTL_SECS` / `IMAGE_CACHE_TTL_SECS` - default 3600
    /// - `RANK_CACHE_TTL_SECS` - default 60
    /// - `USER_SWEEP_INTERVAL_SECS` (60) / `IMAGE_SWEEP_INTERVAL_SECS` (300)
    /// - `RANK_SWEEP_INTERVAL_SECS` - default 60
    /// - `USER_FETCH_DELAY_MS` - default 50
    /// - `UPSTREAM_TIMEOUT_MS` - default 10000
    /// - `ASSETS_DIR` - default `assets`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Fails with [`AppError::Configuration`] when no bot token is present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup(TOKEN_VAR)
            .or_else(|| lookup(LEGACY_TOKEN_VAR))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "{} is not set; the user directory cannot be queried",
                    TOKEN_VAR
                ))
            })?;

        let defaults = Self::with_token(discord_token);
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Ok(Self {
            server_port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.server_port),
            discord_api_base: lookup("DISCORD_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.discord_api_base),
            discord_cdn_base: lookup("DISCORD_CDN_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.discord_cdn_base),
            user_cache_ttl: parsed("USER_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.user_cache_ttl),
            image_cache_ttl: parsed("IMAGE_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.image_cache_ttl),
            rank_cache_ttl: parsed("RANK_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.rank_cache_ttl),
            user_sweep_interval: parsed("USER_SWEEP_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.user_sweep_interval),
            image_sweep_interval: parsed("IMAGE_SWEEP_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.image_sweep_interval),
            rank_sweep_interval: parsed("RANK_SWEEP_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.rank_sweep_interval),
            user_fetch_delay: parsed("USER_FETCH_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.user_fetch_delay),
            upstream_timeout: parsed("UPSTREAM_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.upstream_timeout),
            assets_dir: lookup("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            discord_token: defaults.discord_token,
        })
    }

    /// Default configuration around an explicit token.
    pub fn with_token(discord_token: impl Into<String>) -> Self {
        Self {
            discord_token: discord_token.into(),
            server_port: 3000,
            discord_api_base: "https://discord.com/api/v10".to_string(),
            discord_cdn_base: "https://cdn.discordapp.com".to_string(),
            user_cache_ttl: Duration::from_secs(3600),
            image_cache_ttl: Duration::from_secs(3600),
            rank_cache_ttl: Duration::from_secs(60),
            user_sweep_interval: Duration::from_secs(60),
            image_sweep_interval: Duration::from_secs(300),
            rank_sweep_interval: Duration::from_secs(60),
            user_fetch_delay: Duration::from_millis(50),
            upstream_timeout: Duration::from_millis(10_000),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.user_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.image_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.rank_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.user_sweep_interval, Duration::from_secs(60));
        assert_eq!(config.image_sweep_interval, Duration::from_secs(300));
        assert_eq!(config.rank_sweep_interval, Duration::from_secs(60));
        assert_eq!(config.user_fetch_delay, Duration::from_millis(50));
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "8080")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));

        let blank = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "   ")]));
        assert!(matches!(blank, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_legacy_token_name() {
        let config = Config::from_lookup(lookup_from(&[("Btoken", "legacy")])).unwrap();
        assert_eq!(config.discord_token, "legacy");
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("PORT", "8080"),
            ("USER_FETCH_DELAY_MS", "0"),
            ("IMAGE_SWEEP_INTERVAL_SECS", "0"),
            ("RANK_SWEEP_INTERVAL_SECS", "15"),
            ("RANK_CACHE_TTL_SECS", "not-a-number"),
            ("DISCORD_API_BASE", "http://127.0.0.1:9000/api/"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.user_fetch_delay, Duration::ZERO);
        assert_eq!(config.image_sweep_interval, Duration::from_secs(300));
        assert_eq!(config.rank_sweep_interval, Duration::from_secs(15));
        assert_eq!(config.rank_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.discord_api_base, "http://127.0.0.1:9000/api");
    }
}
