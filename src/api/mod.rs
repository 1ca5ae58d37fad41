// HTTP API module - local read/toggle access to the loop
//
// All endpoints return JSON and are meant for local consumption (scripts,
// status bars, other dashboards). Binds to 127.0.0.1 by default.
//
//   GET  /api/state          full loop snapshot
//   GET  /api/assets?limit=N newest-first assets
//   GET  /api/logs           newest-first loop log entries
//   POST /api/loop/start     \
//   POST /api/loop/stop       } resulting { active, status, stage }
//   POST /api/loop/toggle    /

use crate::model::{ContentAsset, LogEntry};
use crate::orchestrator::{LoopSnapshot, LoopStatus, Orchestrator, Stage, MAX_ASSETS};
use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub fn router(orchestrator: Orchestrator) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/assets", get(get_assets))
        .route("/api/logs", get(get_logs))
        .route("/api/loop/start", post(start_loop))
        .route("/api/loop/stop", post(stop_loop))
        .route("/api/loop/toggle", post(toggle_loop))
        .with_state(orchestrator)
}

/// Serve the API until `shutdown_rx` fires
pub async fn start_api(
    bind_addr: SocketAddr,
    orchestrator: Orchestrator,
    shutdown_rx: oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind API to {}", bind_addr))?;

    tracing::info!("API listening on http://{}", bind_addr);

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("API server error")?;

    tracing::info!("API server shut down gracefully");
    Ok(())
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        tracing::warn!("API error: {} - {}", status, message);

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// GET /api/state
pub async fn get_state(State(orchestrator): State<Orchestrator>) -> Json<LoopSnapshot> {
    Json(orchestrator.snapshot())
}

#[derive(Debug, Deserialize)]
pub struct AssetsQuery {
    /// Max assets to return (default and cap: buffer size)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsResponse {
    pub total_in_buffer: usize,
    pub returned: usize,
    /// Most recent first
    pub assets: Vec<ContentAsset>,
}

/// GET /api/assets?limit=N
pub async fn get_assets(
    State(orchestrator): State<Orchestrator>,
    Query(params): Query<AssetsQuery>,
) -> Result<Json<AssetsResponse>, ApiError> {
    let limit = params.limit.unwrap_or(MAX_ASSETS);
    if limit == 0 {
        return Err(ApiError::BadRequest("limit must be at least 1".to_string()));
    }

    let snapshot = orchestrator.snapshot();
    let total_in_buffer = snapshot.assets.len();
    let assets: Vec<ContentAsset> = snapshot.assets.into_iter().take(limit).collect();

    Ok(Json(AssetsResponse {
        total_in_buffer,
        returned: assets.len(),
        assets,
    }))
}

/// GET /api/logs
pub async fn get_logs(State(orchestrator): State<Orchestrator>) -> Json<Vec<LogEntry>> {
    Json(orchestrator.snapshot().logs)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LoopControlResponse {
    pub active: bool,
    pub status: LoopStatus,
    pub stage: Stage,
}

impl From<LoopSnapshot> for LoopControlResponse {
    fn from(snapshot: LoopSnapshot) -> Self {
        Self {
            active: snapshot.active,
            status: snapshot.status,
            stage: snapshot.stage,
        }
    }
}

/// POST /api/loop/start
pub async fn start_loop(State(orchestrator): State<Orchestrator>) -> Json<LoopControlResponse> {
    orchestrator.start();
    Json(orchestrator.snapshot().into())
}

/// POST /api/loop/stop
pub async fn stop_loop(State(orchestrator): State<Orchestrator>) -> Json<LoopControlResponse> {
    orchestrator.stop();
    Json(orchestrator.snapshot().into())
}

/// POST /api/loop/toggle
pub async fn toggle_loop(State(orchestrator): State<Orchestrator>) -> Json<LoopControlResponse> {
    orchestrator.toggle();
    Json(orchestrator.snapshot().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Collaborators, DemoBackend};
    use crate::config::PersonaConfig;
    use crate::orchestrator::{CycleOutcome, LoopTiming};
    use std::time::Duration;

    fn orchestrator() -> Orchestrator {
        let backend = DemoBackend::new(PersonaConfig::default())
            .with_latency(Duration::ZERO)
            .with_missing_image_rate(0.0);
        Orchestrator::new(
            Collaborators::from_backend(backend),
            LoopTiming {
                settle_delay: Duration::ZERO,
                generation_pause: Duration::ZERO,
                cycle_interval: Duration::from_secs(3600),
            },
        )
    }

    #[tokio::test]
    async fn assets_are_limited_newest_first() {
        let orchestrator = orchestrator();
        assert!(matches!(
            orchestrator.run_single().await,
            CycleOutcome::Completed(_)
        ));

        let Json(all) = get_assets(
            State(orchestrator.clone()),
            Query(AssetsQuery { limit: None }),
        )
        .await
        .unwrap();
        assert_eq!(all.total_in_buffer, 3);
        assert_eq!(all.returned, 3);

        let Json(one) = get_assets(State(orchestrator.clone()), Query(AssetsQuery { limit: Some(1) }))
            .await
            .unwrap();
        assert_eq!(one.returned, 1);
        assert_eq!(one.assets[0], all.assets[0]);

        let body = serde_json::to_value(&one).unwrap();
        assert_eq!(body["totalInBuffer"], 3);
        assert!(body.get("total_in_buffer").is_none());
        assert!(body["assets"][0].get("createdAt").is_some());
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let result = get_assets(State(orchestrator()), Query(AssetsQuery { limit: Some(0) })).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn control_endpoints_report_activity() {
        let orchestrator = orchestrator();

        let Json(started) = start_loop(State(orchestrator.clone())).await;
        assert!(started.active);

        let Json(stopped) = stop_loop(State(orchestrator.clone())).await;
        assert!(!stopped.active);

        let Json(toggled) = toggle_loop(State(orchestrator.clone())).await;
        assert!(toggled.active);

        orchestrator.shutdown().await;
    }

    #[tokio::test]
    async fn state_and_logs_mirror_snapshot() {
        let orchestrator = orchestrator();
        orchestrator.run_single().await;

        let Json(state) = get_state(State(orchestrator.clone())).await;
        let Json(logs) = get_logs(State(orchestrator.clone())).await;
        assert_eq!(state.logs, logs);
        assert_eq!(state.cycles_completed, 1);
        assert!(!state.active);

        let _ = router(orchestrator);
    }
}
