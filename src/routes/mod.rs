//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket session at `/ws`
/// - read-only content API + stateless scoring under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/metrics", get(http::http_get_metrics))
        .route("/api/v1/tips", get(http::http_get_tips))
        .route("/api/v1/tip", get(http::http_get_tip))
        .route("/api/v1/techniques", get(http::http_get_techniques))
        .route("/api/v1/questions", get(http::http_get_questions))
        .route("/api/v1/journey", get(http::http_get_journey))
        .route("/api/v1/assessment/score", post(http::http_post_score))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::AppConfig;

    fn app() -> Router {
        build_router(Arc::new(AppState::from_config(&AppConfig::default())))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let res = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn health_reports_no_sessions() {
        let (status, body) = get_json("/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["activeSessions"], 0);
    }

    #[tokio::test]
    async fn metrics_keep_fixture_schema() {
        let (status, body) = get_json("/api/v1/metrics").await;
        assert_eq!(status, StatusCode::OK);
        for key in [
            "user", "score", "streak", "calories", "sleep", "stress", "hydration", "activity",
            "screenTime", "detox", "milestones",
        ] {
            assert!(body.get(key).is_some(), "missing {key}");
        }
        assert!(body["activity"].get("activeMinutes").is_some());
        assert!(body["detox"].get("daysLeft").is_some());
    }

    #[tokio::test]
    async fn catalogue_endpoints() {
        let (_, techniques) = get_json("/api/v1/techniques").await;
        assert_eq!(techniques[1]["phaseDurations"], serde_json::json!([4, 7, 8, 0]));
        let (_, questions) = get_json("/api/v1/questions").await;
        assert_eq!(questions.as_array().map(|q| q.len()), Some(4));
        let (_, journey) = get_json("/api/v1/journey").await;
        assert_eq!(journey["completed"], 3);
        let (_, tip) = get_json("/api/v1/tip").await;
        assert!(tip["tip"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn score_endpoint() {
        let body = r#"{"answers":{"sleep":2,"energy":3,"stress":3,"diet":2}}"#;
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/assessment/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let v: Value = serde_json::from_slice(&bytes).expect("json");
        // (100 + 100 + 100 + 90) / 4 = 97.5 -> 98
        assert_eq!(v["ok"], true);
        assert_eq!(v["result"]["finalScore"], 98);
        assert_eq!(v["result"]["archetype"], "balanced");
    }
}
