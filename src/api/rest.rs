// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
// Bar submission and snapshot reads live at the root (`/indicators`, with
// `/data` kept as an alias for submission).  Health and the WebSocket push
// feed live under `/api/v1/`.
//
// CORS is configured permissively; the service is meant to be fed from a
// browser page on another origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::app_state::AppState;
use crate::error::ValidationError;
use crate::snapshot::SnapshotView;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/indicators", get(get_indicators).post(submit_bar))
        .route("/data", post(submit_bar))
        .route("/api/v1/health", get(health))
        .route("/api/v1/ws", get(crate::api::ws::ws_handler))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    bars: usize,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        bars: state.bar_count(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Bar submission
// =============================================================================

#[derive(Serialize)]
struct SubmitResponse {
    ok: bool,
    #[serde(flatten)]
    view: SnapshotView,
}

/// Accept one OHLC bar and answer with the snapshot it produced.
///
/// Body rejections (bad JSON, wrong content type) are reported the same way
/// as field validation failures.
async fn submit_bar(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ValidationError> {
    let Json(candidate) = payload.map_err(|e| ValidationError::Malformed(e.body_text()))?;
    let bar = state.submit_bar(&candidate)?;
    info!(close = bar.close, timestamp = %bar.timestamp, "bar accepted");

    Ok(Json(SubmitResponse {
        ok: true,
        view: state.snapshot(),
    }))
}

// =============================================================================
// Snapshot read
// =============================================================================

async fn get_indicators(State(state): State<Arc<AppState>>) -> Json<SnapshotView> {
    Json(state.snapshot())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_config::EngineConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn app() -> (Arc<AppState>, Router) {
        let state = Arc::new(AppState::new(EngineConfig::default()));
        (state.clone(), router(state))
    }

    fn post_json(path: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn bar(close: f64) -> String {
        json!({
            "open": close, "high": close + 1.0, "low": close - 1.0,
            "close": close, "timestamp": "2024-01-01 00:00:00"
        })
        .to_string()
    }

    #[tokio::test]
    async fn post_indicators_accepts_bar() {
        let (state, app) = app();
        let resp = app.oneshot(post_json("/indicators", bar(101.5))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["ready"], json!(false));
        assert_eq!(body["bars"], json!(1));
        assert_eq!(body["latestBar"]["close"], json!(101.5));
        assert_eq!(body["indicators"]["RSI_14"], json!("N/A"));
        assert_eq!(state.bar_count(), 1);
    }

    #[tokio::test]
    async fn data_alias_accepts_bar() {
        let (state, app) = app();
        let resp = app.oneshot(post_json("/data", bar(3.0))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.bar_count(), 1);
    }

    #[tokio::test]
    async fn missing_field_is_invalid_input() {
        let (state, app) = app();
        let body = json!({ "open": 1, "high": 2, "low": 0, "timestamp": "t" }).to_string();
        let resp = app.oneshot(post_json("/indicators", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["ok"], json!(false));
        assert_eq!(body["reason"], json!("invalid-input"));
        assert_eq!(state.bar_count(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_input() {
        let (state, app) = app();
        let resp = app
            .oneshot(post_json("/indicators", "{not json".into()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["reason"], json!("invalid-input"));
        assert_eq!(state.bar_count(), 0);
    }

    #[tokio::test]
    async fn get_indicators_reports_not_ready() {
        let (_state, app) = app();
        let resp = app
            .oneshot(Request::get("/indicators").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["ready"], json!(false));
        assert_eq!(body["latestBar"], Value::Null);
        assert!(body.get("ok").is_none());
        assert!(body["indicators"]
            .as_object()
            .unwrap()
            .values()
            .all(|v| v == "N/A"));
    }

    #[tokio::test]
    async fn health_reports_bars_and_version() {
        let (state, app) = app();
        state.submit_bar(&serde_json::from_str(&bar(10.0)).unwrap()).unwrap();

        let resp = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["bars"], json!(1));
        assert_eq!(body["state_version"], json!(1));
    }
}
