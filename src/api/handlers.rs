//! API Handlers
//!
//! HTTP request handlers for the card endpoints, plus the shared
//! application state they run against.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Local;
use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, warn};

use crate::api::pages::{DOCS_PAGE, HOME_PAGE};
use crate::cache::ResourceCache;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::format::abbreviate;
use crate::images::ImageLoader;
use crate::models::{
    AtmQuery, HealthResponse, ProfileQuery, ProfileResponse, RankQuery, RankedEntry,
    StatsResponse,
};
use crate::render::{AtmCard, ProfileCard, RankedUser, Renderer};
use crate::users::{DiscordClient, UserDirectory, UserResolver};

/// Application state shared across all handlers.
///
/// Every field is a cheap handle; clones share the same caches.
#[derive(Clone)]
pub struct AppState {
    /// User-info cache in front of the directory
    pub users: UserResolver,
    /// Decoded image cache
    pub images: ImageLoader,
    /// Rendered leaderboards keyed by their query
    pub rank_images: ResourceCache<String, Bytes>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    /// Creates a new AppState from configuration.
    ///
    /// Builds one outbound HTTP client with the configured timeout, shared by
    /// the Discord client and the image loader.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        let directory = Arc::new(DiscordClient::new(
            http.clone(),
            config.discord_api_base.clone(),
            config.discord_token.clone(),
        ));

        Ok(Self::with_directory(config, http, directory))
    }

    /// Creates a new AppState over an arbitrary user directory.
    pub fn with_directory(config: &Config, http: Client, directory: Arc<dyn UserDirectory>) -> Self {
        let users = UserResolver::new(
            directory,
            ResourceCache::new("users", config.user_cache_ttl),
            config.discord_cdn_base.as_str(),
            config.user_fetch_delay,
        );
        let images = ImageLoader::new(http, ResourceCache::new("images", config.image_cache_ttl));
        let renderer = Renderer::new(images.clone(), &config.assets_dir);

        Self {
            users,
            images,
            rank_images: ResourceCache::new("rank", config.rank_cache_ttl),
            renderer: Arc::new(renderer),
        }
    }
}

fn png_response(png: impl Into<Bytes>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], png.into()).into_response()
}

/// Handler for GET /
pub async fn home_handler() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// Handler for GET /api
pub async fn docs_handler() -> Html<&'static str> {
    Html(DOCS_PAGE)
}

/// Handler for GET /api/perfil
///
/// Renders the profile card, or returns the profile as JSON with `json=true`.
/// A user that cannot be resolved fails the request.
pub async fn profile_handler(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Response> {
    let coins = query.coins()?;
    let reps = query.reps()?;
    let user = state.users.resolve_user(query.user_id()).await?;

    if query.wants_json() {
        let body = ProfileResponse {
            user: (*user).clone(),
            coins,
            reps,
            status: query.status().to_string(),
            about_me: query.about_me().to_string(),
        };
        return Ok(Json(body).into_response());
    }

    let card = ProfileCard {
        user,
        coins,
        reps,
        status: query.status().to_string(),
        about_me: query.about_me().to_string(),
        banner: query.banner().map(str::to_string),
        created_at: Local::now(),
    };
    let png = state.renderer.render_profile(card).await?;

    Ok(png_response(png))
}

/// Handler for GET /api/rank
///
/// Renders the podium and list. The PNG is cached per query; users that fail
/// to resolve are left out rather than failing the request.
pub async fn rank_handler(
    State(state): State<AppState>,
    Query(query): Query<RankQuery>,
) -> Result<Response> {
    let started = Instant::now();
    let request = query.validate()?;

    if let Some(png) = state.rank_images.peek(&request.cache_key).await {
        debug!("Rank image served from cache");
        return Ok(rank_response(png, "HIT", started));
    }

    let users = state.users.clone();
    let renderer = Arc::clone(&state.renderer);
    let key = request.cache_key.clone();

    let png = state
        .rank_images
        .get_or_fetch(key, move || async move {
            let (podium, list) = tokio::join!(
                resolve_ranked(&users, request.podium, 3),
                resolve_ranked(&users, request.list, 5),
            );
            let list = list.into_iter().flatten().collect();

            renderer.render_rank(podium, list).await.map(Bytes::from)
        })
        .await?;

    Ok(rank_response(png, "MISS", started))
}

/// Resolves the first `limit` entries, keeping their positions.
async fn resolve_ranked(
    users: &UserResolver,
    entries: Vec<RankedEntry>,
    limit: usize,
) -> Vec<Option<RankedUser>> {
    let lookups = entries.into_iter().take(limit).map(move |entry| async move {
        let user = match users.resolve_user(&entry.id).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Skipping rank entry {}: {}", entry.id, e);
                return None;
            }
        };
        let coins = abbreviate(entry.coins).ok()?;
        Some(RankedUser { user, coins })
    });

    join_all(lookups).await
}

fn rank_response(png: Bytes, cache_status: &'static str, started: Instant) -> Response {
    let mut response = png_response(png);
    let headers = response.headers_mut();
    headers.insert("x-cache", HeaderValue::from_static(cache_status));
    if let Ok(value) = HeaderValue::from_str(&format!("{}ms", started.elapsed().as_millis())) {
        headers.insert("x-processing-time", value);
    }
    response
}

/// Handler for GET /api/atm
pub async fn atm_handler(
    State(state): State<AppState>,
    Query(query): Query<AtmQuery>,
) -> Result<Response> {
    let request = query.validate()?;
    let user = state.users.resolve_user(&request.user).await?;

    let card = AtmCard {
        user,
        coins: request.coins,
        bank: request.bank,
    };
    let png = state.renderer.render_atm(card).await?;

    Ok(png_response(png))
}

/// Handler for GET /stats
///
/// Returns the counters of all three caches.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (users, images, rank) = tokio::join!(
        state.users.cache().stats(),
        state.images.cache().stats(),
        state.rank_images.stats(),
    );

    Json(StatsResponse {
        users: users.into(),
        images: images.into(),
        rank: rank.into(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for unmatched routes
pub async fn fallback_handler() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
