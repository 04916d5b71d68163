use super::dates::add_days;
use super::domain::{PermCase, ValidationViolation};
use chrono::NaiveDate;

/// A certified labor certification stays valid this long.
pub const ETA_9089_VALIDITY_DAYS: i64 = 180;

pub fn calculate_eta9089_expiration(certification: NaiveDate) -> Option<NaiveDate> {
    add_days(certification, ETA_9089_VALIDITY_DAYS)
}

/// Recomputed from the certification date; a recorded value is never used.
pub fn effective_eta9089_expiration(case: &PermCase) -> Option<NaiveDate> {
    case.eta9089_certification_date.and_then(calculate_eta9089_expiration)
}

/// The I-140 must be filed on or before the ETA 9089 expires.
pub fn i140_filing_deadline(case: &PermCase) -> Option<NaiveDate> {
    effective_eta9089_expiration(case)
}

/// I-140 filing must fall in (certification, expiration] and precede approval.
pub fn validate_i140(case: &PermCase) -> Vec<ValidationViolation> {
    let mut violations = Vec::new();

    if let Some(filed) = case.i140_filing_date {
        match case.eta9089_certification_date {
            None => violations.push(ValidationViolation::new(
                "i140_filing_date",
                "I-140 cannot be filed before the ETA 9089 is certified",
            )),
            Some(certified) if filed <= certified => violations.push(ValidationViolation::new(
                "i140_filing_date",
                format!("I-140 filed on {filed} must come after ETA 9089 certification on {certified}"),
            )),
            Some(_) => {}
        }

        if let Some(expiration) = effective_eta9089_expiration(case) {
            if filed > expiration {
                violations.push(ValidationViolation::new(
                    "i140_filing_date",
                    format!("I-140 filed on {filed} after the ETA 9089 expired on {expiration}"),
                ));
            }
        }
    }

    match (case.i140_approval_date, case.i140_filing_date) {
        (Some(approved), Some(filed)) if approved < filed => {
            violations.push(ValidationViolation::new(
                "i140_approval_date",
                format!("I-140 approval on {approved} precedes its filing on {filed}"),
            ));
        }
        (Some(_), None) => violations.push(ValidationViolation::new(
            "i140_approval_date",
            "I-140 approval recorded without a filing date",
        )),
        _ => {}
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn certified_case() -> PermCase {
        let mut case = PermCase::default();
        case.eta9089_filing_date = Some(date(2024, 3, 1));
        case.eta9089_certification_date = Some(date(2024, 9, 1));
        case
    }

    #[test]
    fn expiration_is_certification_plus_180_days() {
        assert_eq!(
            calculate_eta9089_expiration(date(2024, 9, 1)),
            Some(date(2025, 2, 28))
        );

        let mut case = certified_case();
        case.eta9089_expiration_date = Some(date(2030, 1, 1));
        assert_eq!(i140_filing_deadline(&case), Some(date(2025, 2, 28)));
    }

    #[test]
    fn filing_inside_validity_passes() {
        let mut case = certified_case();
        case.i140_filing_date = Some(date(2025, 2, 28));
        case.i140_approval_date = Some(date(2025, 6, 1));
        assert!(validate_i140(&case).is_empty());
    }

    #[test]
    fn filing_on_certification_day_is_rejected() {
        let mut case = certified_case();
        case.i140_filing_date = Some(date(2024, 9, 1));
        let violations = validate_i140(&case);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "i140_filing_date");
    }

    #[test]
    fn filing_after_expiration_and_early_approval_are_reported() {
        let mut case = certified_case();
        case.i140_filing_date = Some(date(2025, 3, 1));
        case.i140_approval_date = Some(date(2025, 2, 1));

        let violations = validate_i140(&case);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.contains("expired on 2025-02-28"));
        assert_eq!(violations[1].field, "i140_approval_date");
    }
}
