use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use super::domain::ApplicantId;
use super::service::{SchedulingError, SchedulingService};
use crate::workflows::notify::NotifierPublisher;

/// Router builder exposing HTTP endpoints for the appointment workflow.
pub fn appointment_router<N>(service: Arc<SchedulingService<N>>) -> Router
where
    N: NotifierPublisher + 'static,
{
    Router::new()
        .route("/api/v1/appointments", post(schedule_handler::<N>))
        .route(
            "/api/v1/appointments/:applicant_id",
            get(status_handler::<N>),
        )
        .route(
            "/api/v1/appointments/:applicant_id/reschedule",
            post(reschedule_handler::<N>),
        )
        .route(
            "/api/v1/appointments/:applicant_id/cancel",
            post(cancel_handler::<N>),
        )
        .route(
            "/api/v1/appointments/:applicant_id/complete",
            post(complete_handler::<N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub applicant_id: String,
    #[serde(deserialize_with = "deserialize_slot")]
    pub slot: NaiveDateTime,
    /// Evaluation instant for the temporal rules; defaults to the server's
    /// local clock so the core itself stays clock-free.
    #[serde(default, deserialize_with = "deserialize_optional_slot")]
    pub now: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    #[serde(deserialize_with = "deserialize_slot")]
    pub slot: NaiveDateTime,
    #[serde(default, deserialize_with = "deserialize_optional_slot")]
    pub now: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    #[serde(default, deserialize_with = "deserialize_optional_slot")]
    pub now: Option<NaiveDateTime>,
}

pub(crate) async fn schedule_handler<N>(
    State(service): State<Arc<SchedulingService<N>>>,
    axum::Json(request): axum::Json<ScheduleRequest>,
) -> Response
where
    N: NotifierPublisher + 'static,
{
    let applicant = ApplicantId(request.applicant_id);
    let now = request.now.unwrap_or_else(local_now);
    match service.schedule(&applicant, request.slot, now) {
        Ok(appointment) => {
            (StatusCode::CREATED, axum::Json(appointment.view())).into_response()
        }
        Err(error) => reject(error),
    }
}

pub(crate) async fn reschedule_handler<N>(
    State(service): State<Arc<SchedulingService<N>>>,
    Path(applicant_id): Path<String>,
    axum::Json(request): axum::Json<RescheduleRequest>,
) -> Response
where
    N: NotifierPublisher + 'static,
{
    let applicant = ApplicantId(applicant_id);
    let now = request.now.unwrap_or_else(local_now);
    match service.reschedule(&applicant, request.slot, now) {
        Ok(appointment) => (StatusCode::OK, axum::Json(appointment.view())).into_response(),
        Err(error) => reject(error),
    }
}

pub(crate) async fn cancel_handler<N>(
    State(service): State<Arc<SchedulingService<N>>>,
    Path(applicant_id): Path<String>,
    axum::Json(request): axum::Json<CancelRequest>,
) -> Response
where
    N: NotifierPublisher + 'static,
{
    let applicant = ApplicantId(applicant_id);
    let now = request.now.unwrap_or_else(local_now);
    match service.cancel(&applicant, now) {
        Ok(appointment) => (StatusCode::OK, axum::Json(appointment.view())).into_response(),
        Err(error) => reject(error),
    }
}

pub(crate) async fn complete_handler<N>(
    State(service): State<Arc<SchedulingService<N>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    N: NotifierPublisher + 'static,
{
    let applicant = ApplicantId(applicant_id);
    match service.complete(&applicant) {
        Ok(appointment) => (StatusCode::OK, axum::Json(appointment.view())).into_response(),
        Err(error) => reject(error),
    }
}

pub(crate) async fn status_handler<N>(
    State(service): State<Arc<SchedulingService<N>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    N: NotifierPublisher + 'static,
{
    let applicant = ApplicantId(applicant_id);
    match service.active(&applicant) {
        Some(appointment) => (StatusCode::OK, axum::Json(appointment.view())).into_response(),
        None => {
            let payload = json!({ "error": SchedulingError::AppointmentNotFound.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

fn reject(error: SchedulingError) -> Response {
    let status = match error {
        SchedulingError::ActiveAppointmentExists | SchedulingError::NoAgentAvailable => {
            StatusCode::CONFLICT
        }
        SchedulingError::OutsideBusinessHours | SchedulingError::InsufficientLeadTime => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SchedulingError::AppointmentNotFound => StatusCode::NOT_FOUND,
        SchedulingError::AgentNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parses a slot timestamp as `YYYY-MM-DDTHH:MM`, with the seconds part
/// optional. Shared with the CLI surface so both accept the same shape.
pub fn parse_slot(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM ({err})"))
}

fn deserialize_slot<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_slot(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_slot<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|value| parse_slot(&value).map_err(serde::de::Error::custom))
        .transpose()
}
