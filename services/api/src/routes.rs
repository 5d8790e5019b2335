use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use migradesk::workflows::folders::repository::FolderRepository;
use migradesk::workflows::folders::router::folder_router;
use migradesk::workflows::folders::service::FolderService;
use migradesk::workflows::notify::NotifierPublisher;
use migradesk::workflows::scheduling::router::appointment_router;
use migradesk::workflows::scheduling::service::SchedulingService;
use serde_json::json;

use crate::infra::AppState;

/// Merges both workflow routers with the operational endpoints.
pub(crate) fn with_case_routes<R, N>(
    scheduling: Arc<SchedulingService<N>>,
    folders: Arc<FolderService<R, N>>,
) -> axum::Router
where
    R: FolderRepository + 'static,
    N: NotifierPublisher + 'static,
{
    appointment_router(scheduling)
        .merge(folder_router(folders))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }
}
