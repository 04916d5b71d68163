//! PERM labor-certification deadline engine.
//!
//! Every calculator takes an immutable case snapshot plus the evaluation date
//! and returns derived values; missing inputs yield `None` rather than a
//! guessed date. The `cases` module wraps the engine in a repository-backed
//! service and HTTP router.

pub mod cases;
pub mod dates;
pub mod derive;
pub mod domain;
pub mod eta9089;
pub mod filing;
pub mod policy;
pub mod pwd;
pub mod recruitment;
pub mod report;
pub mod requests;
pub mod status;
pub mod validation;

pub use cases::{case_router, CaseRepository, CaseService, CaseServiceError, RepositoryError};
pub use derive::recalculate;
pub use domain::{
    CaseClosure, CaseId, CaseStatus, ClosureReason, PermCase, ProgressStatus, RecruitmentMethod,
    RecruitmentMethodEntry, StatusSetting, ValidationViolation,
};
pub use eta9089::{calculate_eta9089_expiration, i140_filing_deadline, validate_i140};
pub use filing::{calculate_filing_window, FilingWindow, FilingWindowStatus};
pub use policy::DeadlinePolicy;
pub use pwd::calculate_pwd_expiration;
pub use recruitment::{
    calculate_recruitment_window, recruitment_close, RecruitmentDeadlines, RecruitmentStatus,
    RecruitmentWindow,
};
pub use report::{DeadlineKind, DeadlineReport, UpcomingDeadline, Urgency};
pub use requests::{
    calculate_rfi_due_date, validate_rfe_due_date, RequestEntryError, RequestKind, RfeEntry,
    RfiEntry,
};
pub use status::{
    classify_case, resolve_status, Classification, ResolveMode, ResolvedStatus, Signal,
};
pub use validation::validate_case;
