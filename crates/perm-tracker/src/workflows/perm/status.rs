use super::dates::days_between;
use super::domain::{CaseStatus, ClosureReason, PermCase, ProgressStatus};
use super::eta9089::i140_filing_deadline;
use super::filing::filing_bounds;
use super::policy::DeadlinePolicy;
use super::pwd::effective_pwd_expiration;
use super::recruitment::{
    calculate_recruitment_window, is_recruitment_complete, RecruitmentStatus, RecruitmentWindow,
};
use super::requests::active_entry;
use chrono::NaiveDate;
use serde::Serialize;

/// Advisory action for the host; the engine never applies these itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    SuggestRestartRecruitment {
        pwd_expiration: NaiveDate,
        days_until_pwd_expiration: i64,
    },
    SuggestAutoClose {
        reason: ClosureReason,
    },
    SuggestFileI140 {
        deadline: NaiveDate,
    },
}

impl Signal {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SuggestRestartRecruitment { .. } => "suggest-restart-recruitment",
            Self::SuggestAutoClose { .. } => "suggest-auto-close",
            Self::SuggestFileI140 { .. } => "suggest-file-i140",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: CaseStatus,
    pub progress: ProgressStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ClosureReason>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<Signal>,
}

impl Classification {
    fn new(status: CaseStatus, progress: ProgressStatus) -> Self {
        Self {
            status,
            progress,
            reason: None,
            signals: Vec::new(),
        }
    }

    fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn has_signal(&self, code: &str) -> bool {
        self.signals.iter().any(|signal| signal.code() == code)
    }
}

/// Derive stage and progress from the recorded dates. First matching rule wins.
pub fn classify_case(case: &PermCase, today: NaiveDate, policy: &DeadlinePolicy) -> Classification {
    if case.i140_approval_date.is_some() {
        return Classification::new(CaseStatus::I140, ProgressStatus::Approved);
    }

    if active_entry(&case.rfe_entries).is_some() {
        return Classification::new(CaseStatus::I140, ProgressStatus::RfiRfe);
    }
    if active_entry(&case.rfi_entries).is_some() {
        return Classification::new(CaseStatus::Eta9089, ProgressStatus::RfiRfe);
    }

    if case.i140_filing_date.is_some() {
        return Classification::new(CaseStatus::I140, ProgressStatus::Filed);
    }

    if case.eta9089_certification_date.is_some() {
        let classification = Classification::new(CaseStatus::I140, ProgressStatus::Approved);
        return match i140_filing_deadline(case) {
            Some(deadline) => classification.with_signal(Signal::SuggestFileI140 { deadline }),
            None => classification,
        };
    }

    if case.eta9089_filing_date.is_some() {
        return Classification::new(CaseStatus::Eta9089, ProgressStatus::Filed);
    }

    if let Some(pwd_expiration) = effective_pwd_expiration(case) {
        let days_until_pwd_expiration = days_between(today, pwd_expiration);

        if days_until_pwd_expiration >= 0
            && days_until_pwd_expiration >= policy.restart_recruitment_min_days
            && recruitment_window_missed(case, today)
        {
            return Classification::new(CaseStatus::Recruitment, ProgressStatus::Working)
                .with_signal(Signal::SuggestRestartRecruitment {
                    pwd_expiration,
                    days_until_pwd_expiration,
                });
        }

        if today > pwd_expiration {
            let reason = ClosureReason::PwdExpired;
            let mut classification =
                Classification::new(CaseStatus::Closed, ProgressStatus::Working)
                    .with_signal(Signal::SuggestAutoClose { reason });
            classification.reason = Some(reason);
            return classification;
        }
    }

    if case.has_recruitment_dates() {
        return if is_recruitment_complete(case) {
            Classification::new(CaseStatus::Eta9089, ProgressStatus::Working)
        } else {
            Classification::new(CaseStatus::Recruitment, ProgressStatus::Working)
        };
    }

    if case.has_pwd_dates() {
        let progress = if case.pwd_filing_date.is_some() {
            ProgressStatus::Filed
        } else {
            ProgressStatus::Working
        };
        return Classification::new(CaseStatus::Pwd, progress);
    }

    Classification::new(CaseStatus::Pwd, ProgressStatus::WaitingIntake)
}

/// Recruitment ran out before it finished, or finished but the filing
/// window has since closed.
fn recruitment_window_missed(case: &PermCase, today: NaiveDate) -> bool {
    match calculate_recruitment_window(case, today) {
        RecruitmentWindow::NotYetDetermined => false,
        RecruitmentWindow::Determined(deadlines) => match deadlines.status {
            RecruitmentStatus::Expired => true,
            RecruitmentStatus::InProgress => false,
            RecruitmentStatus::Complete => {
                filing_bounds(case).is_some_and(|bounds| today > bounds.closes_on)
            }
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Manual values win over the classifier.
    #[default]
    PreserveOverrides,
    /// Ignore manual values and report the classifier's answer.
    Rederive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStatus {
    pub status: CaseStatus,
    pub status_label: &'static str,
    pub progress: ProgressStatus,
    pub progress_label: &'static str,
    pub status_overridden: bool,
    pub progress_overridden: bool,
    pub derived: Classification,
}

pub fn resolve_status(
    case: &PermCase,
    today: NaiveDate,
    policy: &DeadlinePolicy,
    mode: ResolveMode,
) -> ResolvedStatus {
    let derived = classify_case(case, today, policy);

    let (manual_status, manual_progress) = match mode {
        ResolveMode::PreserveOverrides => (case.case_status.manual(), case.progress_status.manual()),
        ResolveMode::Rederive => (None, None),
    };

    let status = manual_status.unwrap_or(derived.status);
    let progress = manual_progress.unwrap_or(derived.progress);

    ResolvedStatus {
        status,
        status_label: status.label(),
        progress,
        progress_label: progress.label(),
        status_overridden: manual_status.is_some(),
        progress_overridden: manual_progress.is_some(),
        derived,
    }
}
