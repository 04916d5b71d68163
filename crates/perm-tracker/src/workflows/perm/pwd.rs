use super::dates::add_days;
use super::domain::PermCase;
use chrono::{Datelike, NaiveDate};

/// Determinations issued between April 2 and June 30 stay valid this long.
pub const PWD_IN_WINDOW_VALIDITY_DAYS: i64 = 90;

/// Expiration of a prevailing wage determination.
///
/// Determinations issued April 2 through June 30 expire 90 days later. Any
/// other determination expires on the next June 30 on or after it.
pub fn calculate_pwd_expiration(determination: NaiveDate) -> Option<NaiveDate> {
    let year = determination.year();
    let window_opens = NaiveDate::from_ymd_opt(year, 4, 2)?;
    let june_30 = NaiveDate::from_ymd_opt(year, 6, 30)?;

    if (window_opens..=june_30).contains(&determination) {
        add_days(determination, PWD_IN_WINDOW_VALIDITY_DAYS)
    } else if determination < window_opens {
        Some(june_30)
    } else {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 6, 30)
    }
}

/// PWD expiration recomputed from the determination date.
///
/// A recorded expiration is never trusted on its own.
pub fn effective_pwd_expiration(case: &PermCase) -> Option<NaiveDate> {
    case.pwd_determination_date.and_then(calculate_pwd_expiration)
}

pub fn is_pwd_expired(case: &PermCase, today: NaiveDate) -> bool {
    effective_pwd_expiration(case).is_some_and(|expiration| today > expiration)
}
