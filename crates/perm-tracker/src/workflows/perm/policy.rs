use serde::{Deserialize, Serialize};

const DEFAULT_CLOSING_SOON_DAYS: i64 = 14;
const DEFAULT_RESTART_RECRUITMENT_MIN_DAYS: i64 = 60;
const DEFAULT_URGENT_DAYS: i64 = 7;

/// Advisory thresholds layered on top of the regulatory offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlinePolicy {
    /// An open filing window with this many days or fewer left is "closing soon".
    pub closing_soon_days: i64,
    /// Minimum runway before PWD expiration for a recruitment restart to be suggested.
    pub restart_recruitment_min_days: i64,
    /// Upcoming deadlines within this many days are urgent.
    pub urgent_days: i64,
}

impl DeadlinePolicy {
    pub fn new(closing_soon_days: i64, restart_recruitment_min_days: i64, urgent_days: i64) -> Self {
        let defaults = Self::default();
        Self {
            closing_soon_days: non_negative_or(closing_soon_days, defaults.closing_soon_days),
            restart_recruitment_min_days: non_negative_or(
                restart_recruitment_min_days,
                defaults.restart_recruitment_min_days,
            ),
            urgent_days: non_negative_or(urgent_days, defaults.urgent_days),
        }
    }
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            closing_soon_days: DEFAULT_CLOSING_SOON_DAYS,
            restart_recruitment_min_days: DEFAULT_RESTART_RECRUITMENT_MIN_DAYS,
            urgent_days: DEFAULT_URGENT_DAYS,
        }
    }
}

fn non_negative_or(value: i64, fallback: i64) -> i64 {
    if value >= 0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_thresholds_fall_back_to_defaults() {
        let policy = DeadlinePolicy::new(-1, 90, -5);
        assert_eq!(policy.closing_soon_days, 14);
        assert_eq!(policy.restart_recruitment_min_days, 90);
        assert_eq!(policy.urgent_days, 7);
    }
}
