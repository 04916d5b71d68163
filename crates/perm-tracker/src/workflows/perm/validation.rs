use super::dates::{add_days, is_sunday};
use super::domain::{PermCase, RecruitmentMethod, ValidationViolation};
use super::eta9089::validate_i140;
use super::filing::filing_bounds;
use super::recruitment::{
    is_recruitment_complete, job_order_end, notice_of_filing_end, SUNDAY_AD_SPACING_DAYS,
};
use super::requests::{active_count, validate_rfe_due_date, RequestEntry, RequestKind};
use std::collections::BTreeSet;

/// Every ordering or consistency rule the recorded dates break.
pub fn validate_case(case: &PermCase) -> Vec<ValidationViolation> {
    let mut violations = Vec::new();

    check_pwd(case, &mut violations);
    check_sunday_ads(case, &mut violations);
    check_recruitment_ends(case, &mut violations);
    check_additional_methods(case, &mut violations);
    check_eta9089(case, &mut violations);
    violations.extend(validate_i140(case));
    check_requests(&case.rfi_entries, "rfi_entries", &mut violations);
    check_requests(&case.rfe_entries, "rfe_entries", &mut violations);

    for entry in &case.rfe_entries {
        if let Err(violation) = validate_rfe_due_date(entry.received_date, entry.response_due_date)
        {
            violations.push(ValidationViolation::new("rfe_entries", violation.message));
        }
    }

    violations
}

fn check_pwd(case: &PermCase, violations: &mut Vec<ValidationViolation>) {
    if let (Some(filed), Some(determined)) = (case.pwd_filing_date, case.pwd_determination_date) {
        if determined < filed {
            violations.push(ValidationViolation::new(
                "pwd_determination_date",
                format!("PWD determination on {determined} precedes its filing on {filed}"),
            ));
        }
    }
}

fn check_sunday_ads(case: &PermCase, violations: &mut Vec<ValidationViolation>) {
    for (field, ad) in [
        ("sunday_ad_first_date", case.sunday_ad_first_date),
        ("sunday_ad_second_date", case.sunday_ad_second_date),
    ] {
        if let Some(date) = ad {
            if !is_sunday(date) {
                violations.push(ValidationViolation::new(
                    field,
                    format!("{date} is a {}, Sunday ads must run on a Sunday", date.format("%A")),
                ));
            }
        }
    }

    if let (Some(first), Some(second)) = (case.sunday_ad_first_date, case.sunday_ad_second_date) {
        let earliest_second = add_days(first, SUNDAY_AD_SPACING_DAYS);
        if earliest_second.is_some_and(|earliest| second < earliest) {
            violations.push(ValidationViolation::new(
                "sunday_ad_second_date",
                format!("second Sunday ad on {second} must run at least a week after {first}"),
            ));
        }
    }
}

fn check_recruitment_ends(case: &PermCase, violations: &mut Vec<ValidationViolation>) {
    if let (Some(start), Some(end)) = (
        case.notice_of_filing_start_date,
        case.notice_of_filing_end_date,
    ) {
        if let Some(minimum) = notice_of_filing_end(start, None) {
            if end < minimum {
                violations.push(ValidationViolation::new(
                    "notice_of_filing_end_date",
                    format!("notice of filing must stay posted 10 business days, through {minimum}"),
                ));
            }
        }
    }

    if let (Some(start), Some(end)) = (case.job_order_start_date, case.job_order_end_date) {
        if let Some(minimum) = job_order_end(start, None) {
            if end < minimum {
                violations.push(ValidationViolation::new(
                    "job_order_end_date",
                    format!("job order must run 30 days, through {minimum}"),
                ));
            }
        }
    }
}

fn check_additional_methods(case: &PermCase, violations: &mut Vec<ValidationViolation>) {
    let mut seen: BTreeSet<RecruitmentMethod> = BTreeSet::new();
    for entry in &case.additional_recruitment_methods {
        if !seen.insert(entry.method) {
            violations.push(ValidationViolation::new(
                "additional_recruitment_methods",
                format!("{} is listed more than once", entry.method.label()),
            ));
        }
    }
}

fn check_eta9089(case: &PermCase, violations: &mut Vec<ValidationViolation>) {
    if let Some(filed) = case.eta9089_filing_date {
        if !is_recruitment_complete(case) {
            violations.push(ValidationViolation::new(
                "eta9089_filing_date",
                "ETA 9089 filed before every required recruitment step was recorded",
            ));
        }

        if let Some(bounds) = filing_bounds(case) {
            if filed < bounds.opens_on {
                violations.push(ValidationViolation::new(
                    "eta9089_filing_date",
                    format!(
                        "ETA 9089 filed on {filed} before the 30-day waiting period ended on {}",
                        bounds.opens_on
                    ),
                ));
            }
            if filed > bounds.closes_on {
                violations.push(ValidationViolation::new(
                    "eta9089_filing_date",
                    format!(
                        "ETA 9089 filed on {filed} after the filing window closed on {}",
                        bounds.closes_on
                    ),
                ));
            }
        }
    }

    match (case.eta9089_certification_date, case.eta9089_filing_date) {
        (Some(certified), Some(filed)) if certified < filed => {
            violations.push(ValidationViolation::new(
                "eta9089_certification_date",
                format!("ETA 9089 certification on {certified} precedes its filing on {filed}"),
            ));
        }
        (Some(_), None) => violations.push(ValidationViolation::new(
            "eta9089_certification_date",
            "ETA 9089 certification recorded without a filing date",
        )),
        _ => {}
    }
}

fn check_requests<E: RequestEntry>(
    entries: &[E],
    field: &'static str,
    violations: &mut Vec<ValidationViolation>,
) {
    if active_count(entries) > 1 {
        violations.push(ValidationViolation::new(
            field,
            format!("only one {} may await a response at a time", E::KIND),
        ));
    }

    for entry in entries {
        if let Some(submitted) = entry.response_submitted_date() {
            if submitted < entry.received_date() {
                violations.push(ValidationViolation::new(
                    field,
                    format!(
                        "{} response on {submitted} precedes its receipt on {}",
                        E::KIND,
                        entry.received_date()
                    ),
                ));
            }
        }
    }

    if E::KIND == RequestKind::Rfi && entries.iter().any(|entry| entry.response_due_date().is_none()) {
        violations.push(ValidationViolation::new(
            field,
            "RFI received date is outside the supported calendar range",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::perm::domain::RecruitmentMethodEntry;
    use crate::workflows::perm::requests::{RfeEntry, RfiEntry};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn fields(violations: &[ValidationViolation]) -> Vec<&'static str> {
        violations.iter().map(|violation| violation.field).collect()
    }

    fn filed_case() -> PermCase {
        let mut case = PermCase::default();
        case.pwd_filing_date = Some(date(2023, 11, 1));
        case.pwd_determination_date = Some(date(2024, 1, 2));
        case.notice_of_filing_start_date = Some(date(2024, 1, 2));
        case.job_order_start_date = Some(date(2024, 1, 2));
        case.sunday_ad_first_date = Some(date(2024, 1, 7));
        case.sunday_ad_second_date = Some(date(2024, 1, 14));
        case.eta9089_filing_date = Some(date(2024, 3, 15));
        case
    }

    #[test]
    fn consistent_case_has_no_violations() {
        assert!(validate_case(&filed_case()).is_empty());
        assert!(validate_case(&PermCase::default()).is_empty());
    }

    #[test]
    fn sunday_ads_must_be_sundays_a_week_apart() {
        let mut case = filed_case();
        case.sunday_ad_second_date = Some(date(2024, 1, 9));

        let violations = validate_case(&case);
        assert_eq!(
            fields(&violations),
            vec!["sunday_ad_second_date", "sunday_ad_second_date"]
        );
        assert!(violations[0].message.contains("Tuesday"));
    }

    #[test]
    fn eta9089_filed_during_waiting_period_is_flagged() {
        let mut case = filed_case();
        case.eta9089_filing_date = Some(date(2024, 2, 20));

        let violations = validate_case(&case);
        assert_eq!(fields(&violations), vec!["eta9089_filing_date"]);
        assert!(violations[0].message.contains("2024-03-02"));
    }

    #[test]
    fn shortened_recruitment_end_dates_are_flagged() {
        let mut case = filed_case();
        case.notice_of_filing_end_date = Some(date(2024, 1, 10));
        case.job_order_end_date = Some(date(2024, 1, 20));

        assert_eq!(
            fields(&validate_case(&case)),
            vec!["notice_of_filing_end_date", "job_order_end_date"]
        );
    }

    #[test]
    fn duplicate_methods_and_incomplete_professional_recruitment() {
        let mut case = filed_case();
        case.is_professional_occupation = true;
        case.additional_recruitment_methods = vec![
            RecruitmentMethodEntry {
                method: RecruitmentMethod::JobFair,
                date: Some(date(2024, 1, 10)),
            },
            RecruitmentMethodEntry {
                method: RecruitmentMethod::JobFair,
                date: Some(date(2024, 1, 12)),
            },
        ];

        assert_eq!(
            fields(&validate_case(&case)),
            vec!["additional_recruitment_methods", "eta9089_filing_date"]
        );
    }

    #[test]
    fn request_lists_report_multiple_active_entries() {
        let mut case = PermCase::default();
        case.rfi_entries = vec![RfiEntry::new(date(2024, 4, 1)), RfiEntry::new(date(2024, 4, 5))];
        case.rfe_entries = vec![RfeEntry {
            received_date: date(2024, 5, 1),
            response_due_date: date(2024, 4, 1),
            response_submitted_date: Some(date(2024, 4, 20)),
        }];

        assert_eq!(
            fields(&validate_case(&case)),
            vec!["rfi_entries", "rfe_entries", "rfe_entries"]
        );
    }
}
