//! RFI (DOL) and RFE (USCIS) response tracking.
//!
//! RFI due dates are fixed at receipt + 30 days and cannot be edited; RFE due
//! dates come from the notice itself. Each list may hold at most one entry
//! that is still awaiting a response.

use super::dates::add_days;
use super::domain::ValidationViolation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RFI_RESPONSE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Rfi,
    Rfe,
}

impl RequestKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rfi => "RFI",
            Self::Rfe => "RFE",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn calculate_rfi_due_date(received: NaiveDate) -> Option<NaiveDate> {
    add_days(received, RFI_RESPONSE_DAYS)
}

/// RFE due dates are caller-supplied but must fall after receipt.
pub fn validate_rfe_due_date(
    received: NaiveDate,
    due: NaiveDate,
) -> Result<(), ValidationViolation> {
    if due > received {
        Ok(())
    } else {
        Err(ValidationViolation::new(
            "response_due_date",
            format!("RFE response due {due} must fall after the received date {received}"),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RfiEntryPayload")]
pub struct RfiEntry {
    pub received_date: NaiveDate,
    /// Always `received_date + 30`; `None` only past the calendar range.
    pub response_due_date: Option<NaiveDate>,
    pub response_submitted_date: Option<NaiveDate>,
}

/// Inbound shape; any due date the caller sends is dropped.
#[derive(Deserialize)]
struct RfiEntryPayload {
    received_date: NaiveDate,
    #[serde(default)]
    response_submitted_date: Option<NaiveDate>,
}

impl From<RfiEntryPayload> for RfiEntry {
    fn from(payload: RfiEntryPayload) -> Self {
        let mut entry = RfiEntry::new(payload.received_date);
        entry.response_submitted_date = payload.response_submitted_date;
        entry
    }
}

impl RfiEntry {
    pub fn new(received_date: NaiveDate) -> Self {
        Self {
            received_date,
            response_due_date: calculate_rfi_due_date(received_date),
            response_submitted_date: None,
        }
    }

    pub(crate) fn recalculate(&mut self) {
        self.response_due_date = calculate_rfi_due_date(self.received_date);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfeEntry {
    pub received_date: NaiveDate,
    pub response_due_date: NaiveDate,
    #[serde(default)]
    pub response_submitted_date: Option<NaiveDate>,
}

impl RfeEntry {
    pub fn new(received_date: NaiveDate, response_due_date: NaiveDate) -> Self {
        Self {
            received_date,
            response_due_date,
            response_submitted_date: None,
        }
    }
}

/// Shared view over RFI and RFE entries.
pub trait RequestEntry {
    const KIND: RequestKind;

    fn received_date(&self) -> NaiveDate;
    fn response_due_date(&self) -> Option<NaiveDate>;
    fn response_submitted_date(&self) -> Option<NaiveDate>;
    fn mark_submitted(&mut self, submitted_on: NaiveDate);

    /// Received and not yet answered.
    fn is_active(&self) -> bool {
        self.response_submitted_date().is_none()
    }
}

impl RequestEntry for RfiEntry {
    const KIND: RequestKind = RequestKind::Rfi;

    fn received_date(&self) -> NaiveDate {
        self.received_date
    }

    fn response_due_date(&self) -> Option<NaiveDate> {
        self.response_due_date
    }

    fn response_submitted_date(&self) -> Option<NaiveDate> {
        self.response_submitted_date
    }

    fn mark_submitted(&mut self, submitted_on: NaiveDate) {
        self.response_submitted_date = Some(submitted_on);
    }
}

impl RequestEntry for RfeEntry {
    const KIND: RequestKind = RequestKind::Rfe;

    fn received_date(&self) -> NaiveDate {
        self.received_date
    }

    fn response_due_date(&self) -> Option<NaiveDate> {
        Some(self.response_due_date)
    }

    fn response_submitted_date(&self) -> Option<NaiveDate> {
        self.response_submitted_date
    }

    fn mark_submitted(&mut self, submitted_on: NaiveDate) {
        self.response_submitted_date = Some(submitted_on);
    }
}

/// Rejections raised while mutating RFI/RFE lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestEntryError {
    #[error("the {kind} received on {received_date} is still awaiting a response")]
    ActiveRequestExists {
        kind: RequestKind,
        received_date: NaiveDate,
    },
    #[error("{0}")]
    InvalidDueDate(ValidationViolation),
    #[error("no {kind} received on {received_date} is awaiting a response")]
    NoActiveRequest {
        kind: RequestKind,
        received_date: NaiveDate,
    },
    #[error("response on {submitted_on} precedes the {kind} received on {received_date}")]
    SubmittedBeforeReceived {
        kind: RequestKind,
        received_date: NaiveDate,
        submitted_on: NaiveDate,
    },
}

impl RequestEntryError {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::ActiveRequestExists {
                kind: RequestKind::Rfi,
                ..
            } => "active_rfi_exists",
            Self::ActiveRequestExists {
                kind: RequestKind::Rfe,
                ..
            } => "active_rfe_exists",
            Self::InvalidDueDate(_) => "invalid_due_date",
            Self::NoActiveRequest { .. } => "no_active_request",
            Self::SubmittedBeforeReceived { .. } => "submitted_before_received",
        }
    }
}

pub fn active_entry<E: RequestEntry>(entries: &[E]) -> Option<&E> {
    entries.iter().find(|entry| entry.is_active())
}

pub fn active_count<E: RequestEntry>(entries: &[E]) -> usize {
    entries.iter().filter(|entry| entry.is_active()).count()
}

fn ensure_none_active<E: RequestEntry>(entries: &[E]) -> Result<(), RequestEntryError> {
    match active_entry(entries) {
        Some(active) => Err(RequestEntryError::ActiveRequestExists {
            kind: E::KIND,
            received_date: active.received_date(),
        }),
        None => Ok(()),
    }
}

/// Reject lists holding more than one entry that still awaits a response.
pub fn ensure_single_active<E: RequestEntry>(entries: &[E]) -> Result<(), RequestEntryError> {
    if active_count(entries) <= 1 {
        return Ok(());
    }
    match active_entry(entries) {
        Some(active) => Err(RequestEntryError::ActiveRequestExists {
            kind: E::KIND,
            received_date: active.received_date(),
        }),
        None => Ok(()),
    }
}

pub fn add_rfi(
    entries: &mut Vec<RfiEntry>,
    received: NaiveDate,
) -> Result<RfiEntry, RequestEntryError> {
    ensure_none_active(entries)?;
    let entry = RfiEntry::new(received);
    entries.push(entry.clone());
    Ok(entry)
}

pub fn add_rfe(
    entries: &mut Vec<RfeEntry>,
    received: NaiveDate,
    due: NaiveDate,
) -> Result<RfeEntry, RequestEntryError> {
    ensure_none_active(entries)?;
    validate_rfe_due_date(received, due).map_err(RequestEntryError::InvalidDueDate)?;
    let entry = RfeEntry::new(received, due);
    entries.push(entry.clone());
    Ok(entry)
}

/// Record the response for the active entry received on `received`.
pub fn submit_response<E: RequestEntry>(
    entries: &mut [E],
    received: NaiveDate,
    submitted_on: NaiveDate,
) -> Result<(), RequestEntryError> {
    let entry = entries
        .iter_mut()
        .find(|entry| entry.is_active() && entry.received_date() == received)
        .ok_or(RequestEntryError::NoActiveRequest {
            kind: E::KIND,
            received_date: received,
        })?;

    if submitted_on < received {
        return Err(RequestEntryError::SubmittedBeforeReceived {
            kind: E::KIND,
            received_date: received,
            submitted_on,
        });
    }

    entry.mark_submitted(submitted_on);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn rfi_due_date_is_fixed_at_thirty_days() {
        assert_eq!(calculate_rfi_due_date(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert_eq!(calculate_rfi_due_date(date(2024, 2, 15)), Some(date(2024, 3, 16)));
    }

    #[test]
    fn caller_supplied_rfi_due_date_is_ignored() {
        let entry: RfiEntry = serde_json::from_value(serde_json::json!({
            "received_date": "2024-01-01",
            "response_due_date": "2024-02-15",
        }))
        .expect("entry parses");

        assert_eq!(entry.response_due_date, Some(date(2024, 1, 31)));
        assert!(entry.is_active());
    }

    #[test]
    fn second_active_rfi_is_rejected() {
        let mut entries = Vec::new();
        add_rfi(&mut entries, date(2024, 1, 1)).expect("first rfi accepted");

        let error = add_rfi(&mut entries, date(2024, 1, 10)).expect_err("second rfi rejected");
        assert_eq!(
            error,
            RequestEntryError::ActiveRequestExists {
                kind: RequestKind::Rfi,
                received_date: date(2024, 1, 1),
            }
        );
        assert_eq!(error.reason_code(), "active_rfi_exists");
        assert_eq!(entries.len(), 1);

        submit_response(&mut entries, date(2024, 1, 1), date(2024, 1, 20)).expect("submitted");
        add_rfi(&mut entries, date(2024, 2, 1)).expect("new rfi once the first is answered");
        assert_eq!(active_count(&entries), 1);
    }

    #[test]
    fn imported_lists_with_two_open_entries_are_rejected() {
        let entries = vec![RfiEntry::new(date(2024, 1, 1)), RfiEntry::new(date(2024, 2, 1))];
        let error = ensure_single_active(&entries).expect_err("two open rfis");
        assert_eq!(error.reason_code(), "active_rfi_exists");

        assert!(ensure_single_active(&entries[..1]).is_ok());
        assert!(ensure_single_active::<RfeEntry>(&[]).is_ok());
    }

    #[test]
    fn rfe_due_date_must_follow_receipt() {
        assert!(validate_rfe_due_date(date(2024, 3, 1), date(2024, 5, 30)).is_ok());
        assert!(validate_rfe_due_date(date(2024, 3, 1), date(2024, 3, 1)).is_err());

        let mut entries = Vec::new();
        let error = add_rfe(&mut entries, date(2024, 3, 1), date(2024, 2, 1))
            .expect_err("due date before receipt");
        assert_eq!(error.reason_code(), "invalid_due_date");
        assert!(entries.is_empty());
    }

    #[test]
    fn active_conflict_wins_over_due_date_errors() {
        let mut entries = Vec::new();
        add_rfe(&mut entries, date(2024, 3, 1), date(2024, 5, 30)).expect("first rfe");
        let error = add_rfe(&mut entries, date(2024, 3, 5), date(2024, 3, 1))
            .expect_err("second rfe rejected");
        assert_eq!(error.reason_code(), "active_rfe_exists");
    }

    #[test]
    fn submission_requires_matching_active_entry() {
        let mut entries = vec![RfeEntry::new(date(2024, 3, 1), date(2024, 5, 30))];

        let missing = submit_response(&mut entries, date(2024, 3, 2), date(2024, 4, 1))
            .expect_err("no entry on that date");
        assert_eq!(missing.reason_code(), "no_active_request");

        let early = submit_response(&mut entries, date(2024, 3, 1), date(2024, 2, 28))
            .expect_err("submitted before receipt");
        assert_eq!(early.reason_code(), "submitted_before_received");

        submit_response(&mut entries, date(2024, 3, 1), date(2024, 4, 1)).expect("submitted");
        assert!(active_entry(&entries).is_none());
    }
}
