use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FolderError, FolderId, ReviewDecision, VisaType};
use super::repository::{FolderRepository, RepositoryError};
use super::service::{FolderService, FolderServiceError};
use crate::workflows::notify::NotifierPublisher;

/// Router builder exposing HTTP endpoints for the folder workflow.
pub fn folder_router<R, N>(service: Arc<FolderService<R, N>>) -> Router
where
    R: FolderRepository + 'static,
    N: NotifierPublisher + 'static,
{
    Router::new()
        .route("/api/v1/folders", post(assign_handler::<R, N>))
        .route("/api/v1/folders/:folder_id", get(status_handler::<R, N>))
        .route(
            "/api/v1/folders/:folder_id/documents/:requirement/upload",
            post(upload_handler::<R, N>),
        )
        .route(
            "/api/v1/folders/:folder_id/documents/:requirement/review",
            post(review_handler::<R, N>),
        )
        .route(
            "/api/v1/folders/:folder_id/outcome",
            post(outcome_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub applicant_id: String,
    pub visa_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub file_ref: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewVerdict,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize)]
pub struct OutcomeRequest {
    pub accepted: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

pub(crate) async fn assign_handler<R, N>(
    State(service): State<Arc<FolderService<R, N>>>,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    R: FolderRepository + 'static,
    N: NotifierPublisher + 'static,
{
    let visa_type = VisaType::new(&request.visa_type);
    match service.assign_requirements(&request.applicant_id, visa_type) {
        Ok(folder) => (StatusCode::CREATED, axum::Json(folder.status_view())).into_response(),
        Err(error) => reject(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<FolderService<R, N>>>,
    Path(folder_id): Path<String>,
) -> Response
where
    R: FolderRepository + 'static,
    N: NotifierPublisher + 'static,
{
    match service.get(&FolderId(folder_id)) {
        Ok(folder) => (StatusCode::OK, axum::Json(folder.status_view())).into_response(),
        Err(error) => reject(error),
    }
}

pub(crate) async fn upload_handler<R, N>(
    State(service): State<Arc<FolderService<R, N>>>,
    Path((folder_id, requirement)): Path<(String, String)>,
    axum::Json(request): axum::Json<UploadRequest>,
) -> Response
where
    R: FolderRepository + 'static,
    N: NotifierPublisher + 'static,
{
    match service.upload(&FolderId(folder_id), &requirement, &request.file_ref) {
        Ok(folder) => (StatusCode::OK, axum::Json(folder.status_view())).into_response(),
        Err(error) => reject(error),
    }
}

pub(crate) async fn review_handler<R, N>(
    State(service): State<Arc<FolderService<R, N>>>,
    Path((folder_id, requirement)): Path<(String, String)>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: FolderRepository + 'static,
    N: NotifierPublisher + 'static,
{
    let decision = match request.decision {
        ReviewVerdict::Approve => ReviewDecision::Approve,
        ReviewVerdict::Reject => ReviewDecision::Reject {
            reason: request.reason,
        },
    };
    match service.review(&FolderId(folder_id), &requirement, decision) {
        Ok(folder) => (StatusCode::OK, axum::Json(folder.status_view())).into_response(),
        Err(error) => reject(error),
    }
}

pub(crate) async fn outcome_handler<R, N>(
    State(service): State<Arc<FolderService<R, N>>>,
    Path(folder_id): Path<String>,
    axum::Json(request): axum::Json<OutcomeRequest>,
) -> Response
where
    R: FolderRepository + 'static,
    N: NotifierPublisher + 'static,
{
    match service.record_visa_outcome(&FolderId(folder_id), request.accepted, request.reason) {
        Ok(folder) => (StatusCode::OK, axum::Json(folder.status_view())).into_response(),
        Err(error) => reject(error),
    }
}

fn reject(error: FolderServiceError) -> Response {
    let status = match &error {
        FolderServiceError::State(state) => match state {
            FolderError::UnknownVisaType(_)
            | FolderError::UnknownRequirement(_)
            | FolderError::UploadLocked(_)
            | FolderError::InvalidState(_)
            | FolderError::MissingReason => StatusCode::UNPROCESSABLE_ENTITY,
            FolderError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        },
        FolderServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        FolderServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        FolderServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
