//! Calendar helpers shared by every calculator.
//!
//! All arithmetic is checked: a result outside chrono's supported range comes
//! back as `None`, which callers treat as insufficient data.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Advance by `count` weekdays. Federal holidays are not skipped.
pub fn add_business_days(date: NaiveDate, count: u32) -> Option<NaiveDate> {
    let mut current = date;
    let mut remaining = count;
    while remaining > 0 {
        current = current.succ_opt()?;
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    Some(current)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

pub fn previous_or_same_sunday(date: NaiveDate) -> Option<NaiveDate> {
    let offset = i64::from(date.weekday().num_days_from_sunday());
    add_days(date, -offset)
}

pub fn next_or_same_sunday(date: NaiveDate) -> Option<NaiveDate> {
    let offset = (7 - i64::from(date.weekday().num_days_from_sunday())) % 7;
    add_days(date, offset)
}

pub fn earliest_of<I>(dates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = Option<NaiveDate>>,
{
    dates.into_iter().flatten().min()
}

pub fn latest_of<I>(dates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = Option<NaiveDate>>,
{
    dates.into_iter().flatten().max()
}

/// Signed whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// A deadline bounded both by an anchor date and by an expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CappedDeadline {
    pub date: NaiveDate,
    pub capped_by_expiration: bool,
}

/// min(anchor + `days_after_anchor`, expiration - `days_before_expiration`).
///
/// The expiration term only wins when it is strictly earlier.
pub(crate) fn capped_deadline(
    anchor: NaiveDate,
    days_after_anchor: i64,
    expiration: Option<NaiveDate>,
    days_before_expiration: i64,
) -> Option<CappedDeadline> {
    let from_anchor = add_days(anchor, days_after_anchor)?;
    let from_expiration = expiration.and_then(|date| add_days(date, -days_before_expiration));

    Some(match from_expiration {
        Some(limit) if limit < from_anchor => CappedDeadline {
            date: limit,
            capped_by_expiration: true,
        },
        _ => CappedDeadline {
            date: from_anchor,
            capped_by_expiration: false,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn business_days_skip_weekends() {
        // 2024-01-05 is a Friday.
        assert_eq!(add_business_days(date(2024, 1, 5), 1), Some(date(2024, 1, 8)));
        assert_eq!(add_business_days(date(2024, 1, 1), 10), Some(date(2024, 1, 15)));
        assert_eq!(add_business_days(date(2024, 1, 6), 1), Some(date(2024, 1, 8)));
        assert_eq!(add_business_days(date(2024, 1, 3), 0), Some(date(2024, 1, 3)));
    }

    #[test]
    fn sunday_alignment() {
        let wednesday = date(2024, 1, 10);
        assert!(!is_sunday(wednesday));
        assert_eq!(previous_or_same_sunday(wednesday), Some(date(2024, 1, 7)));
        assert_eq!(next_or_same_sunday(wednesday), Some(date(2024, 1, 14)));

        let sunday = date(2024, 1, 7);
        assert!(is_sunday(sunday));
        assert_eq!(previous_or_same_sunday(sunday), Some(sunday));
        assert_eq!(next_or_same_sunday(sunday), Some(sunday));
    }

    #[test]
    fn earliest_and_latest_ignore_missing_values() {
        let dates = [None, Some(date(2024, 3, 1)), Some(date(2024, 1, 1)), None];
        assert_eq!(earliest_of(dates), Some(date(2024, 1, 1)));
        assert_eq!(latest_of(dates), Some(date(2024, 3, 1)));
        assert_eq!(earliest_of([None, None]), None);
        assert_eq!(latest_of(Vec::<Option<NaiveDate>>::new()), None);
    }

    #[test]
    fn arithmetic_fails_closed_at_calendar_edge() {
        assert_eq!(add_days(NaiveDate::MAX, 1), None);
        assert_eq!(add_business_days(NaiveDate::MAX, 3), None);
    }

    #[test]
    fn capped_deadline_prefers_strictly_earlier_expiration() {
        let anchor = date(2024, 1, 15);
        let uncapped = capped_deadline(anchor, 150, Some(date(2024, 12, 31)), 30)
            .expect("in range");
        assert_eq!(uncapped.date, date(2024, 6, 13));
        assert!(!uncapped.capped_by_expiration);

        let capped =
            capped_deadline(anchor, 150, Some(date(2024, 5, 1)), 30).expect("in range");
        assert_eq!(capped.date, date(2024, 4, 1));
        assert!(capped.capped_by_expiration);

        let tie = capped_deadline(anchor, 150, Some(date(2024, 7, 13)), 30).expect("in range");
        assert_eq!(tie.date, date(2024, 6, 13));
        assert!(!tie.capped_by_expiration);
    }
}
