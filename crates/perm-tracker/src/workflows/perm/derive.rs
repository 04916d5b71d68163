use super::domain::PermCase;
use super::eta9089::effective_eta9089_expiration;
use super::pwd::effective_pwd_expiration;
use super::recruitment::{effective_job_order_end, effective_notice_of_filing_end};

/// Refresh every derived field from its upstream input.
///
/// PWD and ETA 9089 expirations and RFI due dates are overwritten outright.
/// Notice-of-filing and job-order ends only ever move later. Running this
/// twice yields the same case.
pub fn recalculate(case: &mut PermCase) {
    case.pwd_expiration_date = effective_pwd_expiration(case);
    case.eta9089_expiration_date = effective_eta9089_expiration(case);

    if case.notice_of_filing_start_date.is_some() {
        case.notice_of_filing_end_date = effective_notice_of_filing_end(case);
    }
    if case.job_order_start_date.is_some() {
        case.job_order_end_date = effective_job_order_end(case);
    }

    for entry in &mut case.rfi_entries {
        entry.recalculate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::perm::requests::RfiEntry;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn manual_edits_to_derived_dates_are_overwritten() {
        let mut case = PermCase::default();
        case.pwd_determination_date = Some(date(2024, 5, 1));
        case.pwd_expiration_date = Some(date(2026, 1, 1));
        case.eta9089_certification_date = Some(date(2024, 9, 1));
        case.eta9089_expiration_date = None;
        case.rfi_entries.push(RfiEntry {
            received_date: date(2024, 1, 1),
            response_due_date: Some(date(2024, 2, 15)),
            response_submitted_date: None,
        });

        recalculate(&mut case);

        assert_eq!(case.pwd_expiration_date, Some(date(2024, 7, 30)));
        assert_eq!(case.eta9089_expiration_date, Some(date(2025, 2, 28)));
        assert_eq!(case.rfi_entries[0].response_due_date, Some(date(2024, 1, 31)));
    }

    #[test]
    fn clearing_upstream_clears_derived() {
        let mut case = PermCase::default();
        case.pwd_determination_date = Some(date(2024, 5, 1));
        recalculate(&mut case);
        assert!(case.pwd_expiration_date.is_some());

        case.pwd_determination_date = None;
        recalculate(&mut case);
        assert_eq!(case.pwd_expiration_date, None);
    }

    #[test]
    fn recruitment_ends_extend_but_never_shrink() {
        let mut case = PermCase::default();
        case.notice_of_filing_start_date = Some(date(2024, 1, 1));
        case.notice_of_filing_end_date = Some(date(2024, 1, 5));
        case.job_order_start_date = Some(date(2024, 1, 1));
        case.job_order_end_date = Some(date(2024, 3, 1));

        recalculate(&mut case);
        let once = case.clone();
        recalculate(&mut case);

        assert_eq!(case, once);
        assert_eq!(case.notice_of_filing_end_date, Some(date(2024, 1, 15)));
        assert_eq!(case.job_order_end_date, Some(date(2024, 3, 1)));
    }
}
