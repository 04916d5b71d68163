use super::dates::{add_days, capped_deadline, days_between};
use super::domain::PermCase;
use super::policy::DeadlinePolicy;
use super::pwd::effective_pwd_expiration;
use super::recruitment::{first_recruitment_date, is_recruitment_complete, latest_recruitment_end};
use chrono::NaiveDate;
use serde::Serialize;

/// Mandatory wait between the end of recruitment and filing ETA 9089.
pub const FILING_WAIT_DAYS: i64 = 30;
/// ETA 9089 must be filed within this many days of the first recruitment step.
pub const FILING_WINDOW_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilingWindowStatus {
    RecruitmentIncomplete,
    NotOpen,
    Open,
    ClosingSoon { days_remaining: i64 },
    Closed,
}

impl FilingWindowStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RecruitmentIncomplete => "Recruitment incomplete",
            Self::NotOpen => "Not yet open",
            Self::Open => "Open",
            Self::ClosingSoon { .. } => "Closing soon",
            Self::Closed => "Closed",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open | Self::ClosingSoon { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilingWindow {
    pub opens_on: NaiveDate,
    pub closes_on: NaiveDate,
    pub is_pwd_limited: bool,
    /// False when the waiting period ends after the window has already closed.
    pub is_viable: bool,
    pub status: FilingWindowStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FilingBounds {
    pub opens_on: NaiveDate,
    pub closes_on: NaiveDate,
    pub is_pwd_limited: bool,
}

pub(crate) fn filing_bounds(case: &PermCase) -> Option<FilingBounds> {
    let first = first_recruitment_date(case)?;
    let latest_end = latest_recruitment_end(case)?;
    let opens_on = add_days(latest_end, FILING_WAIT_DAYS)?;
    let close = capped_deadline(first, FILING_WINDOW_DAYS, effective_pwd_expiration(case), 0)?;

    Some(FilingBounds {
        opens_on,
        closes_on: close.date,
        is_pwd_limited: close.capped_by_expiration,
    })
}

/// ETA 9089 filing window, or `None` until a recruitment date exists.
pub fn calculate_filing_window(
    case: &PermCase,
    today: NaiveDate,
    policy: &DeadlinePolicy,
) -> Option<FilingWindow> {
    let bounds = filing_bounds(case)?;

    let status = if !is_recruitment_complete(case) {
        FilingWindowStatus::RecruitmentIncomplete
    } else if today > bounds.closes_on {
        FilingWindowStatus::Closed
    } else if today < bounds.opens_on {
        FilingWindowStatus::NotOpen
    } else {
        let days_remaining = days_between(today, bounds.closes_on);
        if days_remaining <= policy.closing_soon_days {
            FilingWindowStatus::ClosingSoon { days_remaining }
        } else {
            FilingWindowStatus::Open
        }
    };

    Some(FilingWindow {
        opens_on: bounds.opens_on,
        closes_on: bounds.closes_on,
        is_pwd_limited: bounds.is_pwd_limited,
        is_viable: bounds.opens_on <= bounds.closes_on,
        status,
    })
}
