use serde::Serialize;

use super::super::domain::{CaseId, CaseStatus, PermCase, ProgressStatus};
use super::super::status::ResolvedStatus;

/// Storage abstraction so the service can be exercised without a database.
pub trait CaseRepository: Send + Sync {
    fn insert(&self, case: PermCase) -> Result<PermCase, RepositoryError>;
    fn get(&self, id: &CaseId) -> Result<Option<PermCase>, RepositoryError>;
    fn update(&self, case: PermCase) -> Result<(), RepositoryError>;
    fn remove(&self, id: &CaseId) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<PermCase>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("case already exists")]
    Conflict,
    #[error("case not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Listing row for a stored case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseSummaryView {
    pub case_id: CaseId,
    pub employer_name: String,
    pub beneficiary_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_title: Option<String>,
    pub status: CaseStatus,
    pub status_label: &'static str,
    pub progress: ProgressStatus,
    pub progress_label: &'static str,
}

impl CaseSummaryView {
    pub fn new(case: &PermCase, resolved: &ResolvedStatus) -> Self {
        Self {
            case_id: case.id.clone(),
            employer_name: case.employer_name.clone(),
            beneficiary_name: case.beneficiary_name.clone(),
            position_title: case.position_title.clone(),
            status: resolved.status,
            status_label: resolved.status_label,
            progress: resolved.progress,
            progress_label: resolved.progress_label,
        }
    }
}
