use super::dates::{
    add_business_days, add_days, capped_deadline, earliest_of, latest_of, previous_or_same_sunday,
};
use super::domain::{PermCase, RecruitmentMethod};
use super::pwd::effective_pwd_expiration;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

pub const NOTICE_OF_FILING_BUSINESS_DAYS: u32 = 10;
pub const JOB_ORDER_MIN_DAYS: i64 = 30;
pub const RECRUITMENT_WINDOW_DAYS: i64 = 150;
pub const RECRUITMENT_PWD_BUFFER_DAYS: i64 = 30;
pub const FIRST_SUNDAY_AD_DAYS: i64 = 143;
pub const FIRST_SUNDAY_AD_PWD_BUFFER_DAYS: i64 = 37;
pub const SUNDAY_AD_SPACING_DAYS: i64 = 7;
pub const REQUIRED_ADDITIONAL_METHODS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecruitmentStatus {
    InProgress,
    Complete,
    Expired,
}

impl RecruitmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
            Self::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruitmentDeadlines {
    pub first_recruitment_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_of_filing_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_order_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_sunday_ad_deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_sunday_ad_deadline: Option<NaiveDate>,
    pub closes_on: NaiveDate,
    pub is_pwd_limited: bool,
    pub status: RecruitmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RecruitmentWindow {
    /// No recruitment step has a date yet.
    NotYetDetermined,
    Determined(RecruitmentDeadlines),
}

impl RecruitmentWindow {
    pub fn deadlines(&self) -> Option<&RecruitmentDeadlines> {
        match self {
            Self::NotYetDetermined => None,
            Self::Determined(deadlines) => Some(deadlines),
        }
    }
}

/// Earliest of the first Sunday ad, job order start, and notice of filing start.
pub fn first_recruitment_date(case: &PermCase) -> Option<NaiveDate> {
    earliest_of([
        case.sunday_ad_first_date,
        case.job_order_start_date,
        case.notice_of_filing_start_date,
    ])
}

/// Posting must run ten business days; a later recorded end is kept.
pub fn notice_of_filing_end(start: NaiveDate, recorded: Option<NaiveDate>) -> Option<NaiveDate> {
    let minimum = add_business_days(start, NOTICE_OF_FILING_BUSINESS_DAYS)?;
    Some(recorded.map_or(minimum, |end| end.max(minimum)))
}

/// Job order must run thirty calendar days; a later recorded end is kept.
pub fn job_order_end(start: NaiveDate, recorded: Option<NaiveDate>) -> Option<NaiveDate> {
    let minimum = add_days(start, JOB_ORDER_MIN_DAYS)?;
    Some(recorded.map_or(minimum, |end| end.max(minimum)))
}

pub fn effective_notice_of_filing_end(case: &PermCase) -> Option<NaiveDate> {
    match case.notice_of_filing_start_date {
        Some(start) => notice_of_filing_end(start, case.notice_of_filing_end_date),
        None => case.notice_of_filing_end_date,
    }
}

pub fn effective_job_order_end(case: &PermCase) -> Option<NaiveDate> {
    match case.job_order_start_date {
        Some(start) => job_order_end(start, case.job_order_end_date),
        None => case.job_order_end_date,
    }
}

/// Distinct additional methods that carry a date.
pub fn completed_additional_methods(case: &PermCase) -> BTreeSet<RecruitmentMethod> {
    case.additional_recruitment_methods
        .iter()
        .filter(|entry| entry.date.is_some())
        .map(|entry| entry.method)
        .collect()
}

pub fn is_recruitment_complete(case: &PermCase) -> bool {
    let mandatory = case.notice_of_filing_start_date.is_some()
        && case.job_order_start_date.is_some()
        && case.sunday_ad_first_date.is_some()
        && case.sunday_ad_second_date.is_some();

    if !mandatory {
        return false;
    }

    !case.is_professional_occupation
        || completed_additional_methods(case).len() >= REQUIRED_ADDITIONAL_METHODS
}

/// Latest date on which any recruitment step finished.
pub fn latest_recruitment_end(case: &PermCase) -> Option<NaiveDate> {
    let mandatory = [
        effective_notice_of_filing_end(case),
        effective_job_order_end(case),
        case.sunday_ad_first_date,
        case.sunday_ad_second_date,
    ];
    let additional = case
        .additional_recruitment_methods
        .iter()
        .map(|entry| entry.date);

    latest_of(mandatory.into_iter().chain(additional))
}

/// Recruitment close as `(closes_on, is_pwd_limited)`.
///
/// min(first + 150 days, PWD expiration - 30 days); the PWD term binds only
/// when strictly earlier.
pub fn recruitment_close(
    first_recruitment: NaiveDate,
    pwd_expiration: Option<NaiveDate>,
) -> Option<(NaiveDate, bool)> {
    capped_deadline(
        first_recruitment,
        RECRUITMENT_WINDOW_DAYS,
        pwd_expiration,
        RECRUITMENT_PWD_BUFFER_DAYS,
    )
    .map(|close| (close.date, close.capped_by_expiration))
}

pub fn calculate_recruitment_window(case: &PermCase, today: NaiveDate) -> RecruitmentWindow {
    let Some(first) = first_recruitment_date(case) else {
        return RecruitmentWindow::NotYetDetermined;
    };
    let pwd_expiration = effective_pwd_expiration(case);

    let Some((closes_on, is_pwd_limited)) = recruitment_close(first, pwd_expiration) else {
        return RecruitmentWindow::NotYetDetermined;
    };

    let first_sunday_ad_deadline = capped_deadline(
        first,
        FIRST_SUNDAY_AD_DAYS,
        pwd_expiration,
        FIRST_SUNDAY_AD_PWD_BUFFER_DAYS,
    )
    .and_then(|deadline| previous_or_same_sunday(deadline.date));

    let second_sunday_ad_deadline = previous_or_same_sunday(closes_on);

    let status = if is_recruitment_complete(case) {
        RecruitmentStatus::Complete
    } else if today > closes_on {
        RecruitmentStatus::Expired
    } else {
        RecruitmentStatus::InProgress
    };

    RecruitmentWindow::Determined(RecruitmentDeadlines {
        first_recruitment_date: first,
        notice_of_filing_end: case
            .notice_of_filing_start_date
            .and_then(|_| effective_notice_of_filing_end(case)),
        job_order_end: case
            .job_order_start_date
            .and_then(|_| effective_job_order_end(case)),
        first_sunday_ad_deadline,
        second_sunday_ad_deadline,
        closes_on,
        is_pwd_limited,
        status,
    })
}
