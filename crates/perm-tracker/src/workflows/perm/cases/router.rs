use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::super::domain::{CaseId, PermCase};
use super::super::requests::{RequestEntryError, RequestKind};
use super::repository::{CaseRepository, RepositoryError};
use super::service::{CaseService, CaseServiceError, StatusOverride};

/// Router builder exposing case lifecycle and deadline endpoints.
pub fn case_router<R>(service: Arc<CaseService<R>>) -> Router
where
    R: CaseRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/cases",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/cases/:case_id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(remove_handler::<R>),
        )
        .route("/api/v1/cases/:case_id/report", get(report_handler::<R>))
        .route("/api/v1/cases/:case_id/rfi", post(add_rfi_handler::<R>))
        .route("/api/v1/cases/:case_id/rfe", post(add_rfe_handler::<R>))
        .route(
            "/api/v1/cases/:case_id/responses",
            post(submit_response_handler::<R>),
        )
        .route(
            "/api/v1/cases/:case_id/status",
            put(set_status_handler::<R>).delete(clear_status_handler::<R>),
        )
        .route(
            "/api/v1/cases/:case_id/auto-close",
            post(auto_close_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TodayQuery {
    pub(crate) today: Option<NaiveDate>,
}

impl TodayQuery {
    fn resolve(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RfiRequest {
    pub(crate) received_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RfeRequest {
    pub(crate) received_date: NaiveDate,
    pub(crate) response_due_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseSubmission {
    pub(crate) kind: RequestKind,
    pub(crate) received_date: NaiveDate,
    pub(crate) submitted_on: NaiveDate,
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    axum::Json(case): axum::Json<PermCase>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.create(case) {
        Ok(case) => (StatusCode::CREATED, axum::Json(case)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.list(query.resolve()) {
        Ok(summaries) => (StatusCode::OK, axum::Json(summaries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.get(&CaseId(case_id)) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
    axum::Json(case): axum::Json<PermCase>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.update_dates(&CaseId(case_id), case) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.remove(&CaseId(case_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.report(&CaseId(case_id), query.resolve()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_rfi_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<RfiRequest>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.add_rfi(&CaseId(case_id), request.received_date) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_rfe_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<RfeRequest>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.add_rfe(
        &CaseId(case_id),
        request.received_date,
        request.response_due_date,
    ) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_response_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
    axum::Json(submission): axum::Json<ResponseSubmission>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let id = CaseId(case_id);
    let result = match submission.kind {
        RequestKind::Rfi => {
            service.submit_rfi_response(&id, submission.received_date, submission.submitted_on)
        }
        RequestKind::Rfe => {
            service.submit_rfe_response(&id, submission.received_date, submission.submitted_on)
        }
    };

    match result {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_status_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
    axum::Json(status): axum::Json<StatusOverride>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.set_status_override(&CaseId(case_id), status) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clear_status_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.clear_status_override(&CaseId(case_id)) {
        Ok(case) => (StatusCode::OK, axum::Json(case)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn auto_close_handler<R>(
    State(service): State<Arc<CaseService<R>>>,
    Path(case_id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let id = CaseId(case_id);
    match service.apply_auto_close(&id, query.resolve()) {
        Ok(closure) => {
            let payload = json!({
                "case_id": id.0,
                "closed": closure.is_some(),
                "closure": closure,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: CaseServiceError) -> Response {
    match error {
        CaseServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "error": "case not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        CaseServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({
                "error": "case already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        CaseServiceError::Request(error) => {
            let status = match error {
                RequestEntryError::ActiveRequestExists { .. } => StatusCode::CONFLICT,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let payload = json!({
                "error": error.to_string(),
                "reason_code": error.reason_code(),
            });
            (status, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
