use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use perm_tracker::error::AppError;
use perm_tracker::workflows::perm::{
    case_router, recalculate, CaseRepository, CaseService, DeadlineReport, PermCase,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct DeadlineReportRequest {
    pub(crate) case: PermCase,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn with_case_routes<R>(service: Arc<CaseService<R>>) -> axum::Router
where
    R: CaseRepository + 'static,
{
    case_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/deadlines/report",
            axum::routing::post(deadline_report_endpoint),
        )
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

/// Report for a case posted inline; nothing is stored.
pub(crate) async fn deadline_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DeadlineReportRequest>,
) -> Result<Json<DeadlineReport>, AppError> {
    let DeadlineReportRequest { mut case, today } = payload;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    recalculate(&mut case);
    let report = DeadlineReport::build(&case, today, &state.deadlines);
    debug!(
        case_id = %report.case_id,
        %today,
        upcoming = report.upcoming.len(),
        violations = report.violations.len(),
        "stateless deadline report built"
    );

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryCaseRepository;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use perm_tracker::workflows::perm::{
        CaseStatus, DeadlineKind, DeadlinePolicy, FilingWindowStatus, ProgressStatus,
    };
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
            deadlines: DeadlinePolicy::default(),
        }
    }

    fn recruited_case() -> PermCase {
        let mut case = PermCase::new("Acme Robotics", "J. Rivera");
        case.pwd_determination_date = Some(date(2024, 1, 2));
        case.notice_of_filing_start_date = Some(date(2024, 1, 2));
        case.job_order_start_date = Some(date(2024, 1, 2));
        case.sunday_ad_first_date = Some(date(2024, 1, 7));
        case.sunday_ad_second_date = Some(date(2024, 1, 14));
        case
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flagged() {
        let response = readiness_endpoint(Extension(app_state(false)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = readiness_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn deadline_report_endpoint_derives_filing_window() {
        let request = DeadlineReportRequest {
            case: recruited_case(),
            today: Some(date(2024, 3, 15)),
        };

        let Json(report) = deadline_report_endpoint(Extension(app_state(true)), Json(request))
            .await
            .expect("report builds");

        assert_eq!(report.pwd_expiration, Some(date(2024, 6, 30)));
        let window = report.filing_window.expect("filing window");
        assert_eq!(window.opens_on, date(2024, 3, 2));
        assert_eq!(window.closes_on, date(2024, 6, 30));
        assert_eq!(window.status, FilingWindowStatus::Open);
        assert_eq!(report.status.status, CaseStatus::Eta9089);
        assert_eq!(report.status.progress, ProgressStatus::Working);
        assert!(report
            .upcoming
            .iter()
            .any(|deadline| deadline.kind == DeadlineKind::Eta9089Filing));
    }

    #[tokio::test]
    async fn router_serves_health_and_rejects_malformed_report_dates() {
        let service = Arc::new(CaseService::new(
            Arc::new(InMemoryCaseRepository::default()),
            DeadlinePolicy::default(),
        ));
        let app = with_case_routes(service).layer(Extension(app_state(true)));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("health responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json!({ "case": {}, "today": "03/01/2024" }).to_string();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/deadlines/report")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("report responds");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
