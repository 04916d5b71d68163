use super::super::domain::{CaseId, PermCase, ValidationViolation};
use super::super::eta9089::{effective_eta9089_expiration, i140_filing_deadline};
use super::super::filing::{calculate_filing_window, FilingWindow};
use super::super::policy::DeadlinePolicy;
use super::super::pwd::effective_pwd_expiration;
use super::super::recruitment::{calculate_recruitment_window, RecruitmentWindow};
use super::super::requests::{active_entry, RfeEntry, RfiEntry};
use super::super::status::{resolve_status, ResolveMode, ResolvedStatus};
use super::super::validation::validate_case;
use super::deadlines::{upcoming_deadlines, UpcomingDeadline};
use chrono::NaiveDate;
use serde::Serialize;

/// Everything the engine can say about one case on one day.
#[derive(Debug, Clone, Serialize)]
pub struct DeadlineReport {
    pub case_id: CaseId,
    pub today: NaiveDate,
    pub pwd_expiration: Option<NaiveDate>,
    pub recruitment: RecruitmentWindow,
    pub filing_window: Option<FilingWindow>,
    pub eta9089_expiration: Option<NaiveDate>,
    pub i140_deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_rfi: Option<RfiEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_rfe: Option<RfeEntry>,
    pub status: ResolvedStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ValidationViolation>,
    pub upcoming: Vec<UpcomingDeadline>,
}

impl DeadlineReport {
    pub fn build(case: &PermCase, today: NaiveDate, policy: &DeadlinePolicy) -> Self {
        Self {
            case_id: case.id.clone(),
            today,
            pwd_expiration: effective_pwd_expiration(case),
            recruitment: calculate_recruitment_window(case, today),
            filing_window: calculate_filing_window(case, today, policy),
            eta9089_expiration: effective_eta9089_expiration(case),
            i140_deadline: i140_filing_deadline(case),
            active_rfi: active_entry(&case.rfi_entries).cloned(),
            active_rfe: active_entry(&case.rfe_entries).cloned(),
            status: resolve_status(case, today, policy, ResolveMode::PreserveOverrides),
            violations: validate_case(case),
            upcoming: upcoming_deadlines(case, today, policy),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn next_deadline(&self) -> Option<&UpcomingDeadline> {
        self.upcoming
            .iter()
            .find(|deadline| deadline.days_remaining >= 0)
    }
}
