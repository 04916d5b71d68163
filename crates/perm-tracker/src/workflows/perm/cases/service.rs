use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::super::derive::recalculate;
use super::super::domain::{
    CaseClosure, CaseId, CaseStatus, PermCase, ProgressStatus, StatusSetting,
};
use super::super::policy::DeadlinePolicy;
use super::super::report::DeadlineReport;
use super::super::requests::{
    add_rfe, add_rfi, ensure_single_active, submit_response, RequestEntryError, RequestKind,
    RfeEntry, RfiEntry,
};
use super::super::status::{classify_case, resolve_status, ResolveMode, Signal};
use super::super::validation::validate_case;
use super::repository::{CaseRepository, CaseSummaryView, RepositoryError};

/// Service wrapping the deadline engine around a case repository.
///
/// Every mutation recalculates derived dates before the case is stored.
/// Mutations read, modify, and write back the whole case without locking it,
/// so concurrent edits to one case are last-writer-wins.
pub struct CaseService<R> {
    repository: Arc<R>,
    policy: DeadlinePolicy,
}

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_id() -> CaseId {
    let id = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CaseId(format!("case-{id:06}"))
}

/// Manual stage/progress values; `None` leaves the current setting alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    #[serde(default)]
    pub case_status: Option<CaseStatus>,
    #[serde(default)]
    pub progress_status: Option<ProgressStatus>,
}

impl<R> CaseService<R>
where
    R: CaseRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: DeadlinePolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &DeadlinePolicy {
        &self.policy
    }

    /// Store a new case under a fresh identifier.
    pub fn create(&self, mut case: PermCase) -> Result<PermCase, CaseServiceError> {
        ensure_single_active(&case.rfi_entries)?;
        ensure_single_active(&case.rfe_entries)?;

        case.id = next_case_id();
        recalculate(&mut case);
        log_violations(&case);

        let stored = self.repository.insert(case)?;
        info!(case_id = %stored.id, employer = %stored.employer_name, "case created");
        Ok(stored)
    }

    pub fn get(&self, id: &CaseId) -> Result<PermCase, CaseServiceError> {
        let case = self.repository.get(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(case)
    }

    pub fn list(&self, today: NaiveDate) -> Result<Vec<CaseSummaryView>, CaseServiceError> {
        let summaries = self
            .repository
            .list()?
            .iter()
            .map(|case| {
                let resolved =
                    resolve_status(case, today, &self.policy, ResolveMode::PreserveOverrides);
                CaseSummaryView::new(case, &resolved)
            })
            .collect();
        Ok(summaries)
    }

    /// Replace the recorded dates and details of a case.
    ///
    /// The identifier, request entries, status settings, and closure have
    /// their own operations and are kept from the stored case.
    pub fn update_dates(
        &self,
        id: &CaseId,
        mut replacement: PermCase,
    ) -> Result<PermCase, CaseServiceError> {
        let current = self.get(id)?;

        replacement.id = current.id;
        replacement.rfi_entries = current.rfi_entries;
        replacement.rfe_entries = current.rfe_entries;
        replacement.case_status = current.case_status;
        replacement.progress_status = current.progress_status;
        replacement.closure = current.closure;

        self.store(replacement)
    }

    pub fn remove(&self, id: &CaseId) -> Result<(), CaseServiceError> {
        self.repository.remove(id)?;
        info!(case_id = %id, "case removed");
        Ok(())
    }

    pub fn add_rfi(&self, id: &CaseId, received: NaiveDate) -> Result<RfiEntry, CaseServiceError> {
        let mut case = self.get(id)?;
        let entry = add_rfi(&mut case.rfi_entries, received)?;
        self.store(case)?;
        info!(case_id = %id, %received, due = ?entry.response_due_date, "rfi recorded");
        Ok(entry)
    }

    pub fn add_rfe(
        &self,
        id: &CaseId,
        received: NaiveDate,
        due: NaiveDate,
    ) -> Result<RfeEntry, CaseServiceError> {
        let mut case = self.get(id)?;
        let entry = add_rfe(&mut case.rfe_entries, received, due)?;
        self.store(case)?;
        info!(case_id = %id, %received, %due, "rfe recorded");
        Ok(entry)
    }

    pub fn submit_rfi_response(
        &self,
        id: &CaseId,
        received: NaiveDate,
        submitted_on: NaiveDate,
    ) -> Result<PermCase, CaseServiceError> {
        self.submit(id, RequestKind::Rfi, received, submitted_on)
    }

    pub fn submit_rfe_response(
        &self,
        id: &CaseId,
        received: NaiveDate,
        submitted_on: NaiveDate,
    ) -> Result<PermCase, CaseServiceError> {
        self.submit(id, RequestKind::Rfe, received, submitted_on)
    }

    pub fn set_status_override(
        &self,
        id: &CaseId,
        status: StatusOverride,
    ) -> Result<PermCase, CaseServiceError> {
        let mut case = self.get(id)?;
        if let Some(value) = status.case_status {
            case.case_status = StatusSetting::Manual(value);
        }
        if let Some(value) = status.progress_status {
            case.progress_status = StatusSetting::Manual(value);
        }
        info!(case_id = %id, ?status, "status override set");
        self.store(case)
    }

    /// Hand both stage and progress back to the classifier.
    pub fn clear_status_override(&self, id: &CaseId) -> Result<PermCase, CaseServiceError> {
        let mut case = self.get(id)?;
        case.case_status = StatusSetting::Derived;
        case.progress_status = StatusSetting::Derived;
        info!(case_id = %id, "status override cleared");
        self.store(case)
    }

    pub fn report(&self, id: &CaseId, today: NaiveDate) -> Result<DeadlineReport, CaseServiceError> {
        let case = self.get(id)?;
        Ok(DeadlineReport::build(&case, today, &self.policy))
    }

    /// Act on an auto-close suggestion for the case.
    ///
    /// Returns the closure now on record, or `None` when the classifier does
    /// not suggest closing. An already closed case is left untouched.
    pub fn apply_auto_close(
        &self,
        id: &CaseId,
        today: NaiveDate,
    ) -> Result<Option<CaseClosure>, CaseServiceError> {
        let mut case = self.get(id)?;
        if case.closure.is_some() {
            return Ok(case.closure);
        }

        let classification = classify_case(&case, today, &self.policy);
        let reason = classification.signals.iter().find_map(|signal| match signal {
            Signal::SuggestAutoClose { reason } => Some(*reason),
            _ => None,
        });

        let Some(reason) = reason else {
            debug!(case_id = %id, %today, "no auto-close suggested");
            return Ok(None);
        };

        let closure = CaseClosure {
            reason,
            closed_on: today,
        };
        case.closure = Some(closure);
        case.case_status = StatusSetting::Manual(CaseStatus::Closed);
        self.store(case)?;

        info!(case_id = %id, reason = reason.code(), %today, "case auto-closed");
        Ok(Some(closure))
    }

    fn submit(
        &self,
        id: &CaseId,
        kind: RequestKind,
        received: NaiveDate,
        submitted_on: NaiveDate,
    ) -> Result<PermCase, CaseServiceError> {
        let mut case = self.get(id)?;
        match kind {
            RequestKind::Rfi => submit_response(&mut case.rfi_entries, received, submitted_on)?,
            RequestKind::Rfe => submit_response(&mut case.rfe_entries, received, submitted_on)?,
        }
        info!(case_id = %id, %kind, %received, %submitted_on, "response submitted");
        self.store(case)
    }

    fn store(&self, mut case: PermCase) -> Result<PermCase, CaseServiceError> {
        recalculate(&mut case);
        log_violations(&case);
        self.repository.update(case.clone())?;
        Ok(case)
    }
}

fn log_violations(case: &PermCase) {
    let violations = validate_case(case);
    if !violations.is_empty() {
        warn!(
            case_id = %case.id,
            count = violations.len(),
            first = %violations[0],
            "case dates break validation rules"
        );
    }
}

/// Error raised by the case service.
#[derive(Debug, thiserror::Error)]
pub enum CaseServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Request(#[from] RequestEntryError),
}
