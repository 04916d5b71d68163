use super::super::dates::days_between;
use super::super::domain::{CaseStatus, PermCase};
use super::super::eta9089::{effective_eta9089_expiration, i140_filing_deadline};
use super::super::filing::filing_bounds;
use super::super::policy::DeadlinePolicy;
use super::super::pwd::effective_pwd_expiration;
use super::super::recruitment::{
    calculate_recruitment_window, is_recruitment_complete, RecruitmentStatus,
};
use super::super::requests::{active_entry, RequestEntry};
use super::super::status::{resolve_status, ResolveMode};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    PwdExpiration,
    RecruitmentExpires,
    ReadyToFile,
    Eta9089Filing,
    Eta9089Expiration,
    I140Deadline,
    RfiResponseDue,
    RfeResponseDue,
}

impl DeadlineKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PwdExpiration => "PWD Expiration",
            Self::RecruitmentExpires => "Recruitment Expires",
            Self::ReadyToFile => "Ready to File",
            Self::Eta9089Filing => "ETA 9089 Filing",
            Self::Eta9089Expiration => "ETA 9089 Expiration",
            Self::I140Deadline => "I-140 Deadline",
            Self::RfiResponseDue => "RFI Response Due",
            Self::RfeResponseDue => "RFE Response Due",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Overdue,
    Urgent,
    Upcoming,
}

impl Urgency {
    pub fn classify(days_remaining: i64, policy: &DeadlinePolicy) -> Self {
        if days_remaining < 0 {
            Self::Overdue
        } else if days_remaining <= policy.urgent_days {
            Self::Urgent
        } else {
            Self::Upcoming
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::Urgent => "Urgent",
            Self::Upcoming => "Upcoming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingDeadline {
    pub kind: DeadlineKind,
    pub label: &'static str,
    pub due_date: NaiveDate,
    pub days_remaining: i64,
    pub urgency: Urgency,
}

/// Deadlines still ahead of the case, soonest first.
///
/// Deadlines an already-recorded step satisfies are left out, and a closed
/// case has none.
pub fn upcoming_deadlines(
    case: &PermCase,
    today: NaiveDate,
    policy: &DeadlinePolicy,
) -> Vec<UpcomingDeadline> {
    let status = resolve_status(case, today, policy, ResolveMode::PreserveOverrides).status;
    if case.closure.is_some() || status == CaseStatus::Closed || case.i140_approval_date.is_some()
    {
        return Vec::new();
    }

    let mut pending: Vec<(DeadlineKind, NaiveDate)> = Vec::new();

    if case.eta9089_filing_date.is_none() {
        if let Some(expiration) = effective_pwd_expiration(case) {
            pending.push((DeadlineKind::PwdExpiration, expiration));
        }

        if let Some(deadlines) = calculate_recruitment_window(case, today).deadlines() {
            if deadlines.status != RecruitmentStatus::Complete {
                pending.push((DeadlineKind::RecruitmentExpires, deadlines.closes_on));
            }
        }

        if let Some(bounds) = filing_bounds(case) {
            if is_recruitment_complete(case)
                && bounds.opens_on <= bounds.closes_on
                && today <= bounds.opens_on
            {
                pending.push((DeadlineKind::ReadyToFile, bounds.opens_on));
            }
            pending.push((DeadlineKind::Eta9089Filing, bounds.closes_on));
        }
    }

    if case.i140_filing_date.is_none() {
        if let Some(expiration) = effective_eta9089_expiration(case) {
            pending.push((DeadlineKind::Eta9089Expiration, expiration));
        }
        if let Some(deadline) = i140_filing_deadline(case) {
            pending.push((DeadlineKind::I140Deadline, deadline));
        }
    }

    if let Some(rfi) = active_entry(&case.rfi_entries) {
        if let Some(due) = rfi.response_due_date() {
            pending.push((DeadlineKind::RfiResponseDue, due));
        }
    }
    if let Some(rfe) = active_entry(&case.rfe_entries) {
        pending.push((DeadlineKind::RfeResponseDue, rfe.response_due_date));
    }

    pending.sort_by_key(|(kind, due_date)| (*due_date, *kind));

    pending
        .into_iter()
        .map(|(kind, due_date)| {
            let days_remaining = days_between(today, due_date);
            UpcomingDeadline {
                kind,
                label: kind.label(),
                due_date,
                days_remaining,
                urgency: Urgency::classify(days_remaining, policy),
            }
        })
        .collect()
}
