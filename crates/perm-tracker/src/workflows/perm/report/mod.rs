mod deadlines;
mod summary;

pub use deadlines::{upcoming_deadlines, DeadlineKind, UpcomingDeadline, Urgency};
pub use summary::DeadlineReport;
