use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::perm::cases::repository::{CaseRepository, RepositoryError};
use crate::workflows::perm::cases::{case_router, CaseService};
use crate::workflows::perm::domain::{CaseId, PermCase};
use crate::workflows::perm::policy::DeadlinePolicy;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// PWD determined early January, all mandatory recruitment recorded.
pub(super) fn recruited_case() -> PermCase {
    let mut case = PermCase::new("Acme Robotics", "J. Rivera");
    case.position_title = Some("Controls Engineer".to_string());
    case.pwd_filing_date = Some(date(2023, 11, 1));
    case.pwd_determination_date = Some(date(2024, 1, 2));
    case.notice_of_filing_start_date = Some(date(2024, 1, 2));
    case.job_order_start_date = Some(date(2024, 1, 2));
    case.sunday_ad_first_date = Some(date(2024, 1, 7));
    case.sunday_ad_second_date = Some(date(2024, 1, 14));
    case
}

/// PWD determined 2023-08-01, expired 2024-06-30, nothing filed.
pub(super) fn expired_pwd_case() -> PermCase {
    let mut case = PermCase::new("Northwind", "A. Chen");
    case.pwd_determination_date = Some(date(2023, 8, 1));
    case
}

pub(super) fn build_service() -> (CaseService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = CaseService::new(repository.clone(), DeadlinePolicy::default());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) cases: Arc<Mutex<HashMap<CaseId, PermCase>>>,
}

impl CaseRepository for MemoryRepository {
    fn insert(&self, case: PermCase) -> Result<PermCase, RepositoryError> {
        let mut guard = self.cases.lock().expect("repository mutex poisoned");
        if guard.contains_key(&case.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(case.id.clone(), case.clone());
        Ok(case)
    }

    fn get(&self, id: &CaseId) -> Result<Option<PermCase>, RepositoryError> {
        let guard = self.cases.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, case: PermCase) -> Result<(), RepositoryError> {
        let mut guard = self.cases.lock().expect("repository mutex poisoned");
        guard.insert(case.id.clone(), case);
        Ok(())
    }

    fn remove(&self, id: &CaseId) -> Result<(), RepositoryError> {
        let mut guard = self.cases.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<PermCase>, RepositoryError> {
        let guard = self.cases.lock().expect("repository mutex poisoned");
        let mut cases: Vec<PermCase> = guard.values().cloned().collect();
        cases.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(cases)
    }
}

pub(super) struct ConflictRepository;

impl CaseRepository for ConflictRepository {
    fn insert(&self, _case: PermCase) -> Result<PermCase, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn get(&self, _id: &CaseId) -> Result<Option<PermCase>, RepositoryError> {
        Ok(None)
    }

    fn update(&self, _case: PermCase) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn remove(&self, _id: &CaseId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list(&self) -> Result<Vec<PermCase>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl CaseRepository for UnavailableRepository {
    fn insert(&self, _case: PermCase) -> Result<PermCase, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: &CaseId) -> Result<Option<PermCase>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _case: PermCase) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &CaseId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<PermCase>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

pub(super) fn case_router_with_service(service: CaseService<MemoryRepository>) -> axum::Router {
    case_router(Arc::new(service))
}
