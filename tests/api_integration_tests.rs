//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint against an
//! in-memory user directory and a temporary assets directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use nano_api::{
    create_router,
    users::{DiscordUser, UserDirectory},
    AppError, AppState, Config, Result,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Types ==

/// Directory that knows a fixed set of users and counts upstream calls.
#[derive(Default)]
struct FakeDirectory {
    users: Mutex<HashMap<String, DiscordUser>>,
    calls: Mutex<HashMap<String, usize>>,
    total_calls: AtomicUsize,
}

impl FakeDirectory {
    fn with_users(ids: &[&str]) -> Self {
        let directory = Self::default();
        {
            let mut users = directory.users.lock().unwrap();
            for id in ids {
                users.insert(
                    id.to_string(),
                    DiscordUser {
                        id: id.to_string(),
                        username: format!("user_{id}"),
                        global_name: Some(format!("Player {id}")),
                        discriminator: Some("0".to_string()),
                        avatar: None,
                    },
                );
            }
        }
        directory
    }

    fn calls_for(&self, id: &str) -> usize {
        self.calls.lock().unwrap().get(id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn fetch_user(&self, id: &str) -> Result<DiscordUser> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(id.to_string()).or_default() += 1;

        self.users
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(AppError::Upstream {
                status: Some(404),
                message: "Not Found".to_string(),
            })
    }
}

struct TestApp {
    router: Router,
    directory: Arc<FakeDirectory>,
    // Keeps the assets directory alive for the test's duration
    _assets: TempDir,
}

// == Helper Functions ==

fn write_png(path: &Path, color: Rgba<u8>) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, color))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

fn create_test_app() -> TestApp {
    let assets = tempfile::tempdir().unwrap();
    write_png(&assets.path().join("discordblue.png"), Rgba([88, 101, 242, 255]));
    write_png(&assets.path().join("Bbanner.png"), Rgba([30, 30, 60, 255]));
    write_png(&assets.path().join("icons/coins.png"), Rgba([255, 200, 0, 255]));
    write_png(&assets.path().join("backgrounds/rank.png"), Rgba([240, 240, 240, 255]));

    let mut config = Config::with_token("test-token");
    config.user_fetch_delay = Duration::from_millis(20);
    config.assets_dir = assets.path().to_path_buf();

    let directory = Arc::new(FakeDirectory::with_users(&[
        "1159667835761594449",
        "1",
        "2",
        "3",
        "4",
        "5",
        "6",
    ]));
    let state = AppState::with_directory(&config, reqwest::Client::new(), directory.clone());

    TestApp {
        router: create_router(state),
        directory,
        _assets: assets,
    }
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_to_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn assert_png(response: &Response) {
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
}

fn png_size(bytes: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png).unwrap();
    (image.width(), image.height())
}

// == Profile Endpoint Tests ==

#[tokio::test]
async fn test_profile_png_with_defaults() {
    let app = create_test_app();

    let response = get(&app.router, "/api/perfil").await;
    assert_png(&response);
    assert_eq!(png_size(&body_bytes(response).await), (800, 450));

    assert_eq!(app.directory.calls_for("1159667835761594449"), 1);
}

#[tokio::test]
async fn test_profile_json() {
    let app = create_test_app();

    let response = get(
        &app.router,
        "/api/perfil?id=1&coins=1500&reps=2000000&status=Casado(a)&aboutMe=Oi&json=true",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    assert_eq!(json["id"], "1");
    assert_eq!(json["username"], "user_1");
    assert_eq!(json["displayName"], "Player 1");
    assert_eq!(json["avatar"], Value::Null);
    assert_eq!(json["coins"], "1.5K");
    assert_eq!(json["reps"], "2.0M");
    assert_eq!(json["status"], "Casado(a)");
    assert_eq!(json["aboutMe"], "Oi");
}

#[tokio::test]
async fn test_profile_unknown_banner_falls_back() {
    let app = create_test_app();

    let response = get(&app.router, "/api/perfil?id=2&banner=/missing/banner.png").await;
    assert_png(&response);
}

#[tokio::test]
async fn test_profile_local_banner_path_uses_default_banner() {
    let app = create_test_app();

    // A readable image outside the assets directory
    let elsewhere = tempfile::tempdir().unwrap();
    let secret = elsewhere.path().join("secret.png");
    write_png(&secret, Rgba([255, 0, 0, 255]));

    let uri = format!("/api/perfil?id=1&banner={}", secret.display());
    let response = get(&app.router, &uri).await;
    assert_png(&response);

    let png = body_bytes(response).await;
    let image = image::load_from_memory_with_format(&png, ImageFormat::Png)
        .unwrap()
        .to_rgba8();
    assert_eq!(*image.get_pixel(400, 50), Rgba([30, 30, 60, 255]));
}

#[tokio::test]
async fn test_profile_invalid_input() {
    let app = create_test_app();

    let response = get(&app.router, "/api/perfil?id=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app.router, "/api/perfil?id=1&coins=many").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.directory.total_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_profile_unknown_user() {
    let app = create_test_app();

    let response = get(&app.router, "/api/perfil?id=999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_lookup() {
    let app = create_test_app();

    let requests = (0..10).map(|_| get(&app.router, "/api/perfil?id=3&json=true"));
    let responses = futures::future::join_all(requests).await;

    for response in responses {
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(app.directory.calls_for("3"), 1);

    // Later requests are served from the cache
    let response = get(&app.router, "/api/perfil?id=3&json=true").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.directory.calls_for("3"), 1);
}

// == Rank Endpoint Tests ==

const RANK_QUERY: &str = "/api/rank?extraData=1:300,2:200,3:100&data=1:10,2:20,3:30,4:40,5:50";

#[tokio::test]
async fn test_rank_miss_then_hit() {
    let app = create_test_app();

    let first = get(&app.router, RANK_QUERY).await;
    assert_png(&first);
    assert_eq!(first.headers()["x-cache"], "MISS");
    assert!(first.headers()["x-processing-time"]
        .to_str()
        .unwrap()
        .ends_with("ms"));
    let first_body = body_bytes(first).await;
    assert_eq!(png_size(&first_body), (525, 350));

    let second = get(&app.router, RANK_QUERY).await;
    assert_eq!(second.headers()["x-cache"], "HIT");
    assert_eq!(body_bytes(second).await, first_body);

    // Each user was fetched once even though most appear in both lists
    for id in ["1", "2", "3", "4", "5"] {
        assert_eq!(app.directory.calls_for(id), 1);
    }
}

#[tokio::test]
async fn test_rank_tolerates_unknown_users() {
    let app = create_test_app();

    let response = get(
        &app.router,
        "/api/rank?extraData=1:3,404:2,3:1&data=1:1,2:2,404:3,4:4,5:5",
    )
    .await;
    assert_png(&response);
}

#[tokio::test]
async fn test_rank_validation() {
    let app = create_test_app();

    let response = get(&app.router, "/api/rank?extraData=1:1,2:2,3:3").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app.router, "/api/rank?extraData=1:1,2:x&data=1:1,2:2,3:3,4:4,5:5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("extraData"));

    let response = get(&app.router, "/api/rank?extraData=1:1,2:2,3:3&data=1:1,2:2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == ATM Endpoint Tests ==

#[tokio::test]
async fn test_atm_png() {
    let app = create_test_app();

    let response = get(&app.router, "/api/atm?user=6&coins=1200&bank=3400000").await;
    assert_png(&response);
    assert_eq!(png_size(&body_bytes(response).await), (800, 300));
}

#[tokio::test]
async fn test_atm_validation() {
    let app = create_test_app();

    let response = get(&app.router, "/api/atm?user=6&coins=1200").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app.router, "/api/atm?user=6&coins=abc&bank=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_atm_unknown_user() {
    let app = create_test_app();

    let response = get(&app.router, "/api/atm?user=404&coins=1&bank=1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Stats & Health Tests ==

#[tokio::test]
async fn test_stats_reflect_traffic() {
    let app = create_test_app();

    get(&app.router, "/api/perfil?id=1&json=true").await;
    get(&app.router, "/api/perfil?id=1&json=true").await;

    let json = body_to_json(get(&app.router, "/stats").await).await;
    assert_eq!(json["users"]["misses"], 1);
    assert_eq!(json["users"]["hits"], 1);
    assert_eq!(json["users"]["total_entries"], 1);
    assert_eq!(json["rank"]["total_entries"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = get(&app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Fallback Tests ==

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let response = get(&app.router, "/api/unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_bytes(response).await, b"Route not found");
}
