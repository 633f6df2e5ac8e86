//! API Routes
//!
//! Configures the Axum router with all card endpoints.

use axum::{http::header, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::handlers::{
    atm_handler, docs_handler, fallback_handler, health_handler, home_handler, profile_handler,
    rank_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Landing page
/// - `GET /api` - Route documentation
/// - `GET /api/perfil` - Profile card (PNG or JSON)
/// - `GET /api/rank` - Leaderboard podium
/// - `GET /api/atm` - ATM receipt
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Compression: gzip when the client accepts it
/// - `X-Content-Type-Options: nosniff` on every response
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home_handler))
        .route("/api", get(docs_handler))
        .route("/api/perfil", get(profile_handler))
        .route("/api/rank", get(rank_handler))
        .route("/api/atm", get(atm_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            header::HeaderValue::from_static("nosniff"),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{AppError, Result};
    use crate::users::{DiscordUser, UserDirectory};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    struct EmptyDirectory;

    #[async_trait]
    impl UserDirectory for EmptyDirectory {
        async fn fetch_user(&self, _id: &str) -> Result<DiscordUser> {
            Err(AppError::Upstream {
                status: Some(404),
                message: "Not Found".to_string(),
            })
        }
    }

    fn create_test_app() -> Router {
        let mut config = Config::with_token("test-token");
        config.user_fetch_delay = Duration::ZERO;
        let state =
            AppState::with_directory(&config, reqwest::Client::new(), Arc::new(EmptyDirectory));
        create_router(state)
    }

    async fn get_status(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(get_status("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(get_status("/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_html_pages() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

        assert_eq!(get_status("/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Route not found");
    }

    #[tokio::test]
    async fn test_rank_missing_params() {
        assert_eq!(get_status("/api/rank").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_atm_missing_params() {
        assert_eq!(get_status("/api/atm?user=1").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_invalid_id() {
        assert_eq!(
            get_status("/api/perfil?id=not-a-number").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_profile_unknown_user() {
        assert_eq!(get_status("/api/perfil?id=5").await, StatusCode::NOT_FOUND);
    }
}
