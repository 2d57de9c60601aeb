use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use carta::acquire::{AcquireError, normalize_url};
use carta::types::{AcquireMethod, FetchResult};
use carta::{ExtractOptions, PageAcquirer, extract_menu, presets};

/// Shared, immutable service state. The reqwest client is reusable across
/// requests; rendering-mode browsers are launched per request inside the
/// acquirer.
pub struct AppState {
    acquirer: PageAcquirer,
    options: ExtractOptions,
}

impl AppState {
    pub fn new() -> Result<Self, AcquireError> {
        Ok(Self {
            acquirer: PageAcquirer::new()?,
            options: ExtractOptions::default(),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(describe))
        .route("/health", get(health))
        .route("/preset-menus", get(preset_menus))
        .route("/fetch-menu", post(fetch_menu))
        .route("/fetch-menu-js", post(fetch_menu_js))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct FetchMenuRequest {
    url: Option<String>,
}

async fn describe() -> Json<Value> {
    Json(json!({
        "service": "carta-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /fetch-menu": "Fetch a URL and extract its menu",
            "POST /fetch-menu-js": "Fetch via headless browser, then extract",
            "GET /preset-menus": "Static fallback menus for known restaurants",
            "GET /health": "Liveness probe",
        },
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn preset_menus() -> Json<Vec<presets::PresetMenu>> {
    Json(presets::preset_menus())
}

async fn fetch_menu(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FetchMenuRequest>,
) -> Response {
    run_fetch(state, request, AcquireMethod::Http).await
}

async fn fetch_menu_js(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FetchMenuRequest>,
) -> Response {
    run_fetch(state, request, AcquireMethod::Browser).await
}

async fn run_fetch(
    state: Arc<AppState>,
    request: FetchMenuRequest,
    method: AcquireMethod,
) -> Response {
    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "URL required" })),
        )
            .into_response();
    };

    let acquired = match method {
        AcquireMethod::Http => state.acquirer.fetch_page(&url).await,
        AcquireMethod::Browser => state.acquirer.fetch_rendered(&url).await,
    };

    match acquired {
        Ok(html) => {
            let items = extract_menu(&html, &state.options);
            log::info!("Extracted {} item(s) from {}", items.len(), url);
            let result = FetchResult::new(items, normalize_url(&url), method);
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => {
            log::error!("Failed to acquire {}: {}", url, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error_body(&e))).into_response()
        }
    }
}

/// Maps each acquisition failure to a distinct user-facing message plus a
/// raw debug code.
fn error_body(error: &AcquireError) -> Value {
    let (summary, details, debug_info) = match error {
        AcquireError::HostUnreachable(_) => (
            "Website not found",
            "The website address could not be resolved. Check the URL and try again.",
            "dns_resolution_failed",
        ),
        AcquireError::Timeout(_) => (
            "Connection timed out",
            "The website took too long to respond.",
            "timeout",
        ),
        AcquireError::Forbidden(_) => (
            "Access blocked",
            "The website refused the request. It may be blocking automated access.",
            "http_403",
        ),
        AcquireError::NotFound(_) => (
            "Page not found",
            "The page does not exist at that address. Check the URL path.",
            "http_404",
        ),
        AcquireError::Browser(_) => (
            "Failed to render page",
            "The headless browser could not load the page.",
            "render_failed",
        ),
        AcquireError::Http(_) => (
            "Failed to fetch menu",
            "The page could not be retrieved.",
            "fetch_failed",
        ),
    };

    json!({
        "success": false,
        "error": summary,
        "details": details,
        "debugInfo": debug_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_router() -> Router {
        let state = Arc::new(AppState::new().expect("state should build"));
        router(state)
    }

    async fn send_json(router: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build");

        let response = router.oneshot(request).await.expect("request should run");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, value)
    }

    async fn send_get(router: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");

        let response = router.oneshot(request).await.expect("request should run");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, value)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = send_get(test_router(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_service_descriptor() {
        let (status, body) = send_get(test_router(), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "carta-server");
        assert!(body["endpoints"].get("POST /fetch-menu").is_some());
    }

    #[tokio::test]
    async fn test_preset_menus() {
        let (status, body) = send_get(test_router(), "/preset-menus").await;

        assert_eq!(status, StatusCode::OK);
        let menus = body.as_array().expect("should be an array");
        assert!(!menus.is_empty());
        assert!(menus[0]["items"][0]["name"].is_string());
        assert!(menus[0]["items"][0]["price"].is_number());
    }

    #[tokio::test]
    async fn test_fetch_menu_requires_url() {
        let (status, body) = send_json(test_router(), "/fetch-menu", "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL required");
    }

    #[tokio::test]
    async fn test_fetch_menu_rejects_blank_url() {
        let (status, body) = send_json(test_router(), "/fetch-menu", r#"{"url": "  "}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL required");
    }

    #[tokio::test]
    async fn test_fetch_menu_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<div class="menu-item">Margherita £10.95</div>"#),
            )
            .mount(&server)
            .await;

        let body = format!(r#"{{"url": "{}/menu"}}"#, server.uri());
        let (status, value) = send_json(test_router(), "/fetch-menu", &body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 1);
        assert_eq!(value["method"], "http");
        assert_eq!(value["items"][0]["name"], "Margherita");
        assert_eq!(value["items"][0]["price"], 10.95);
        assert_eq!(value["items"][0]["category"], "main");
    }

    #[tokio::test]
    async fn test_fetch_menu_empty_page_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Opening hours</p>"))
            .mount(&server)
            .await;

        let body = format!(r#"{{"url": "{}/menu"}}"#, server.uri());
        let (status, value) = send_json(test_router(), "/fetch-menu", &body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 0);
        assert_eq!(value["items"], json!([]));
    }

    #[tokio::test]
    async fn test_fetch_menu_target_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let body = format!(r#"{{"url": "{}/menu"}}"#, server.uri());
        let (status, value) = send_json(test_router(), "/fetch-menu", &body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Page not found");
        assert_eq!(value["debugInfo"], "http_404");
    }

    #[tokio::test]
    async fn test_fetch_menu_target_403() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let body = format!(r#"{{"url": "{}/menu"}}"#, server.uri());
        let (status, value) = send_json(test_router(), "/fetch-menu", &body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["error"], "Access blocked");
        assert_eq!(value["debugInfo"], "http_403");
    }

    #[tokio::test]
    async fn test_fetch_menu_unreachable_host() {
        // Nothing listens on port 1; the connect error maps to the DNS/
        // unreachable message.
        let (status, value) =
            send_json(test_router(), "/fetch-menu", r#"{"url": "http://127.0.0.1:1"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Website not found");
    }
}
