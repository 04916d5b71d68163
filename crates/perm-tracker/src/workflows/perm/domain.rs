use super::requests::{RfeEntry, RfiEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub String);

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pwd,
    Recruitment,
    Eta9089,
    I140,
    Closed,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pwd => "PWD",
            Self::Recruitment => "Recruitment",
            Self::Eta9089 => "ETA 9089",
            Self::I140 => "I-140",
            Self::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Working,
    WaitingIntake,
    Filed,
    Approved,
    UnderReview,
    RfiRfe,
}

impl ProgressStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Working => "Working on it",
            Self::WaitingIntake => "Waiting for intake",
            Self::Filed => "Filed",
            Self::Approved => "Approved",
            Self::UnderReview => "Under review",
            Self::RfiRfe => "RFI/RFE",
        }
    }
}

/// Either follow the classifier or pin a value chosen by a person.
///
/// Manual values survive recalculation; only an explicit re-derive resets
/// them back to `Derived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum StatusSetting<T> {
    Derived,
    Manual(T),
}

impl<T> Default for StatusSetting<T> {
    fn default() -> Self {
        Self::Derived
    }
}

impl<T: Copy> StatusSetting<T> {
    pub fn manual(&self) -> Option<T> {
        match self {
            Self::Derived => None,
            Self::Manual(value) => Some(*value),
        }
    }

    pub fn resolve(&self, derived: T) -> T {
        self.manual().unwrap_or(derived)
    }
}

/// Additional recruitment steps for professional occupations (20 CFR 656.17(e)(1)(ii)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecruitmentMethod {
    JobFair,
    EmployerWebsite,
    JobSearchWebsite,
    OnCampusRecruiting,
    TradeOrProfessionalOrganization,
    PrivateEmploymentFirm,
    EmployeeReferralProgram,
    CampusPlacementOffice,
    LocalOrEthnicNewspaper,
    RadioOrTvAdvertisement,
}

impl RecruitmentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::JobFair => "Job fair",
            Self::EmployerWebsite => "Employer's website",
            Self::JobSearchWebsite => "Job search website",
            Self::OnCampusRecruiting => "On-campus recruiting",
            Self::TradeOrProfessionalOrganization => "Trade or professional organization",
            Self::PrivateEmploymentFirm => "Private employment firm",
            Self::EmployeeReferralProgram => "Employee referral program with incentives",
            Self::CampusPlacementOffice => "Campus placement office",
            Self::LocalOrEthnicNewspaper => "Local or ethnic newspaper",
            Self::RadioOrTvAdvertisement => "Radio or television advertisement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentMethodEntry {
    pub method: RecruitmentMethod,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    PwdExpired,
}

impl ClosureReason {
    pub const fn code(self) -> &'static str {
        match self {
            Self::PwdExpired => "pwd-expired",
        }
    }
}

/// Closure applied by the host after acting on an auto-close signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseClosure {
    pub reason: ClosureReason,
    pub closed_on: NaiveDate,
}

/// Snapshot of every date and flag the rule engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermCase {
    pub id: CaseId,
    pub employer_name: String,
    pub beneficiary_name: String,
    pub position_title: Option<String>,

    pub pwd_filing_date: Option<NaiveDate>,
    pub pwd_determination_date: Option<NaiveDate>,
    pub pwd_expiration_date: Option<NaiveDate>,

    pub notice_of_filing_start_date: Option<NaiveDate>,
    pub notice_of_filing_end_date: Option<NaiveDate>,
    pub job_order_start_date: Option<NaiveDate>,
    pub job_order_end_date: Option<NaiveDate>,
    pub sunday_ad_first_date: Option<NaiveDate>,
    pub sunday_ad_second_date: Option<NaiveDate>,
    pub is_professional_occupation: bool,
    pub additional_recruitment_methods: Vec<RecruitmentMethodEntry>,

    pub eta9089_filing_date: Option<NaiveDate>,
    pub eta9089_certification_date: Option<NaiveDate>,
    pub eta9089_expiration_date: Option<NaiveDate>,

    pub i140_filing_date: Option<NaiveDate>,
    pub i140_approval_date: Option<NaiveDate>,

    pub rfi_entries: Vec<RfiEntry>,
    pub rfe_entries: Vec<RfeEntry>,

    pub case_status: StatusSetting<CaseStatus>,
    pub progress_status: StatusSetting<ProgressStatus>,
    pub closure: Option<CaseClosure>,
}

impl PermCase {
    pub fn new(employer_name: impl Into<String>, beneficiary_name: impl Into<String>) -> Self {
        Self {
            employer_name: employer_name.into(),
            beneficiary_name: beneficiary_name.into(),
            ..Self::default()
        }
    }

    pub fn has_pwd_dates(&self) -> bool {
        self.pwd_filing_date.is_some()
            || self.pwd_determination_date.is_some()
            || self.pwd_expiration_date.is_some()
    }

    /// True once a step that can start recruitment has a date.
    pub fn has_recruitment_dates(&self) -> bool {
        self.notice_of_filing_start_date.is_some()
            || self.job_order_start_date.is_some()
            || self.sunday_ad_first_date.is_some()
    }
}

/// Ordering or consistency rule broken by the recorded dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationViolation {
    pub field: &'static str,
    pub message: String,
}

impl ValidationViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
