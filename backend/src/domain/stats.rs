//! Registration statistics exposed to the public page and the admin panel.
//!
//! Every window is anchored at the start of the current UTC day: "within N
//! days" means `created_at >= today_00:00 - N days`. The "today" window
//! therefore spans the previous calendar day as well as the current one.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};

/// Default reporting period in days.
pub const DEFAULT_PERIOD_DAYS: u16 = 30;
/// Longest reporting period in days.
pub const MAX_PERIOD_DAYS: u16 = 365;

const WEEK_DAYS: u64 = 7;
const TODAY_DAYS: u64 = 1;

/// Error raised for an out-of-range reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsPeriodError {
    /// Longest accepted period.
    pub max: u16,
}

impl fmt::Display for StatsPeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "period must be between 1 and {} days", self.max)
    }
}

impl std::error::Error for StatsPeriodError {}

/// Reporting period in whole days.
///
/// ## Invariants
/// - `1 <= days <= MAX_PERIOD_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsPeriod(u16);

impl StatsPeriod {
    /// Validate a period length.
    pub fn new(days: u16) -> Result<Self, StatsPeriodError> {
        if days == 0 || days > MAX_PERIOD_DAYS {
            return Err(StatsPeriodError {
                max: MAX_PERIOD_DAYS,
            });
        }
        Ok(Self(days))
    }

    /// Period length in days.
    pub fn days(self) -> u16 {
        self.0
    }
}

impl Default for StatsPeriod {
    fn default() -> Self {
        Self(DEFAULT_PERIOD_DAYS)
    }
}

/// Lower bounds of every reporting window, resolved against one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindows {
    /// Start of the requested period.
    pub period_start: DateTime<Utc>,
    /// Start of the seven-day window.
    pub week_start: DateTime<Utc>,
    /// Start of the "today" window.
    pub today_start: DateTime<Utc>,
}

impl StatsWindows {
    /// Resolve windows for `period` relative to `now`.
    pub fn resolve(now: DateTime<Utc>, period: StatsPeriod) -> Self {
        let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
        let back = |days: u64| {
            midnight
                .checked_sub_days(Days::new(days))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        };
        Self {
            period_start: back(u64::from(period.days())),
            week_start: back(WEEK_DAYS),
            today_start: back(TODAY_DAYS),
        }
    }
}

/// Counts shown on the public landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicStats {
    /// Active users overall.
    pub total_users: u64,
    /// Active users registered in the week window.
    pub users_this_week: u64,
    /// Active users registered in the today window.
    pub users_today: u64,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminStatsOverview {
    /// All users regardless of status.
    pub total_users: u64,
    /// Users registered in the requested period.
    pub users_this_period: u64,
    /// Users registered in the week window.
    pub users_this_week: u64,
    /// Users registered in the today window.
    pub users_today: u64,
    /// Users with status `active`.
    pub active_users: u64,
    /// Users with status `inactive`.
    pub inactive_users: u64,
    /// Users with status `banned`.
    pub banned_users: u64,
}

/// Registrations on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRegistrations {
    /// Calendar day.
    pub date: NaiveDate,
    /// Users created that day.
    pub count: u64,
}

/// Overview plus daily trend for the admin dashboard.
///
/// Trends are ascending by date; days without registrations are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStats {
    /// Aggregate counts.
    pub overview: AdminStatsOverview,
    /// Daily registrations within the period.
    pub trends: Vec<DailyRegistrations>,
}
