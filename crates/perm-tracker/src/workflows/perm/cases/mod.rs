//! Case lifecycle around the deadline engine: repository seam, service, and
//! HTTP routes.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{CaseRepository, CaseSummaryView, RepositoryError};
pub use router::case_router;
pub use service::{CaseService, CaseServiceError, StatusOverride};
