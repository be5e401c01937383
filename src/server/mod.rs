use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::Utc;
use tracing::{error, info};

use crate::scrape::fetch::{HttpLineSource, LineSource};
use crate::scrape::orchestrator;
use crate::scrape::types::Target;
use crate::snapshot::{self, WaitlistSnapshot};

pub mod types;

use types::{HealthResponse, RunFailure};

/// waitline serve (waitlist HTTP API)
#[derive(clap::Args)]
pub struct ServeCmd {
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: String,
    /// Snapshot file overwritten on every successful run
    #[arg(long, default_value = "data.json")]
    snapshot: PathBuf,
    #[arg(long, default_value_t = orchestrator::DEFAULT_CONCURRENCY)]
    concurrency: usize,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub targets: Arc<Vec<Target>>,
    pub source: Arc<dyn LineSource>,
    pub snapshot_path: PathBuf,
    pub concurrency: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/waitlist", get(get_waitlist))
        .route("/api/health", get(get_health))
        .with_state(state)
}

pub async fn run(targets: Vec<Target>, args: ServeCmd) -> Result<()> {
    let source = HttpLineSource::new(Duration::from_secs(args.timeout_secs))
        .context("build HTTP client")?;
    let state = AppState {
        targets: Arc::new(targets),
        source: Arc::new(source),
        snapshot_path: args.snapshot,
        concurrency: args.concurrency,
    };

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    info!(addr = %args.addr, "serving waitlist API");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// One full orchestration run per request; the snapshot file is part of the
/// contract, so a failed write fails the run.
async fn get_waitlist(State(state): State<AppState>) -> Response {
    match run_waitlist(&state).await {
        Ok(snap) => Json(snap).into_response(),
        Err(err) => {
            error!(error = %format!("{err:#}"), "waitlist run failed");
            let body = RunFailure::new(format!("{err:#}"));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

async fn run_waitlist(state: &AppState) -> Result<WaitlistSnapshot> {
    let batch =
        orchestrator::run_batch(state.source.as_ref(), &state.targets, state.concurrency).await;
    let snap = WaitlistSnapshot::from_batch(&batch);
    snapshot::write(&state.snapshot_path, &snap)?;
    info!(
        restaurants = snap.restaurants.len(),
        duration_seconds = snap.scrape_duration_seconds,
        "waitlist run complete"
    );
    Ok(snap)
}

async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        total_restaurants: state.targets.len(),
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    use super::*;
    use crate::scrape::fetch::RetrievalError;

    /// Serves a fixed line text for every store except a scripted failure.
    struct FakeSource {
        fail_store: Option<u32>,
    }

    #[async_trait]
    impl LineSource for FakeSource {
        async fn fetch_line_text(&self, target: &Target) -> Result<String, RetrievalError> {
            if self.fail_store == Some(target.store_id) {
                return Err(RetrievalError::MissingLineText);
            }
            Ok(format!("{} parties in line", target.store_id))
        }
    }

    fn state(fail_store: Option<u32>, snapshot_path: PathBuf) -> AppState {
        let targets = vec![
            Target {
                store_id: 2,
                city: "Robson".to_string(),
                address: "778 Robson St".to_string(),
            },
            Target {
                store_id: 1,
                city: "Burnaby".to_string(),
                address: "4300 Kingsway".to_string(),
            },
        ];
        AppState {
            targets: Arc::new(targets),
            source: Arc::new(FakeSource { fail_store }),
            snapshot_path,
            concurrency: orchestrator::DEFAULT_CONCURRENCY,
        }
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_target_count_without_scraping() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(None, dir.path().join("data.json")));

        let resp = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["total_restaurants"], 2);
        // no orchestration ran, so no snapshot appeared
        assert!(!dir.path().join("data.json").exists());
    }

    #[tokio::test]
    async fn waitlist_returns_sorted_rows_and_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let app = router(state(None, path.clone()));

        let resp = app
            .oneshot(Request::builder().uri("/api/waitlist").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["restaurants"][0]["city"], "Burnaby");
        assert_eq!(json["restaurants"][0]["parties_in_line"], 1);
        assert_eq!(json["restaurants"][1]["city"], "Robson");
        assert_eq!(json["restaurants"][1]["name"], "Big Way Robson");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn failed_target_is_null_in_successful_response() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(Some(2), dir.path().join("data.json")));

        let resp = app
            .oneshot(Request::builder().uri("/api/waitlist").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["restaurants"][0]["parties_in_line"], 1);
        assert!(json["restaurants"][1]["parties_in_line"].is_null());
    }

    #[tokio::test]
    async fn unwritable_snapshot_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        // a directory at the snapshot path makes the write fail
        let path = dir.path().join("data.json");
        std::fs::create_dir(&path).unwrap();
        let app = router(state(None, path));

        let resp = app
            .oneshot(Request::builder().uri("/api/waitlist").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("snapshot"));
        assert_eq!(json["restaurants"].as_array().unwrap().len(), 0);
    }
}
