//! Retention schedule for automatically clearing old clipboard history.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Error raised when a schedule is built from invalid input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutoClearError {
    /// The duration type is not one of the known units.
    #[error("unknown auto-clear duration type: {0} (expected days, weeks, months or year)")]
    UnknownDurationType(String),
    /// The duration is not offered for the unit.
    #[error("{duration} is not a valid duration for {duration_type}; allowed: {allowed}")]
    InvalidDuration {
        /// Requested duration.
        duration: u32,
        /// Unit of the duration.
        duration_type: DurationType,
        /// Durations accepted for the unit.
        allowed: String,
    },
}

/// Unit of the auto-clear retention period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    /// Keep history for a number of days.
    Days,
    /// Keep history for a number of weeks.
    #[default]
    Weeks,
    /// Keep history for a number of months.
    Months,
    /// Keep history for a number of years.
    Year,
}

impl DurationType {
    /// Every duration type in menu order.
    pub const ALL: [Self; 4] = [Self::Days, Self::Weeks, Self::Months, Self::Year];

    /// Durations offered for this unit.
    #[must_use]
    pub const fn options(self) -> &'static [u32] {
        match self {
            Self::Days => &[1, 2, 3, 4, 5, 6],
            Self::Weeks => &[1, 2, 3],
            Self::Months => &[1, 3, 6, 8],
            Self::Year => &[1, 2],
        }
    }

    /// Length of one unit in days. Months count as 30 days, years as 365.
    #[must_use]
    pub const fn unit_days(self) -> i64 {
        match self {
            Self::Days => 1,
            Self::Weeks => 7,
            Self::Months => 30,
            Self::Year => 365,
        }
    }

    /// Wire name used in settings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Year => "year",
        }
    }

    /// Human readable label such as `1 Week` or `3 Months`.
    #[must_use]
    pub fn label(self, duration: u32) -> String {
        let unit = match (self, duration == 1) {
            (Self::Days, true) => "Day",
            (Self::Days, false) => "Days",
            (Self::Weeks, true) => "Week",
            (Self::Weeks, false) => "Weeks",
            (Self::Months, true) => "Month",
            (Self::Months, false) => "Months",
            (Self::Year, true) => "Year",
            (Self::Year, false) => "Years",
        };
        format!("{duration} {unit}")
    }
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationType {
    type Err = AutoClearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AutoClearError::UnknownDurationType(s.to_owned()))
    }
}

/// A validated retention period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoClearSchedule {
    duration: u32,
    duration_type: DurationType,
}

impl Default for AutoClearSchedule {
    fn default() -> Self {
        Self {
            duration: 1,
            duration_type: DurationType::Weeks,
        }
    }
}

impl AutoClearSchedule {
    /// Build a schedule, rejecting durations not offered for `duration_type`.
    ///
    /// # Errors
    /// Returns [`AutoClearError::InvalidDuration`] for a duration outside the options.
    pub fn new(duration_type: DurationType, duration: u32) -> Result<Self, AutoClearError> {
        let mut schedule = Self {
            duration: 1,
            duration_type,
        };
        schedule.set_duration(duration)?;
        Ok(schedule)
    }

    /// Number of units retained.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Unit of the retention period.
    #[must_use]
    pub const fn duration_type(&self) -> DurationType {
        self.duration_type
    }

    /// Switch the unit. The duration resets to 1, which every unit offers.
    pub const fn set_duration_type(&mut self, duration_type: DurationType) {
        self.duration_type = duration_type;
        self.duration = 1;
    }

    /// Change the number of units.
    ///
    /// # Errors
    /// Returns [`AutoClearError::InvalidDuration`] for a duration outside the options.
    pub fn set_duration(&mut self, duration: u32) -> Result<(), AutoClearError> {
        if !self.duration_type.options().contains(&duration) {
            return Err(invalid_duration(duration, self.duration_type));
        }
        self.duration = duration;
        Ok(())
    }

    /// Label of the current schedule.
    #[must_use]
    pub fn label(&self) -> String {
        self.duration_type.label(self.duration)
    }

    /// Length of the retention period.
    #[must_use]
    pub fn retention(&self) -> Duration {
        Duration::days(i64::from(self.duration) * self.duration_type.unit_days())
    }

    /// Oldest creation time that is kept at `now`.
    #[must_use]
    pub fn cutoff(&self, now: OffsetDateTime) -> OffsetDateTime {
        now - self.retention()
    }

    /// Whether an entry created at `created_at` is cleared at `now`.
    #[must_use]
    pub fn is_expired(&self, created_at: OffsetDateTime, now: OffsetDateTime) -> bool {
        created_at < self.cutoff(now)
    }
}

/// Check that `duration` is offered for `duration_type`.
///
/// # Errors
/// Returns [`AutoClearError::InvalidDuration`] when it is not.
pub fn ensure_valid_duration(duration_type: DurationType, duration: u32) -> Result<(), AutoClearError> {
    AutoClearSchedule::new(duration_type, duration).map(|_| ())
}

fn invalid_duration(duration: u32, duration_type: DurationType) -> AutoClearError {
    AutoClearError::InvalidDuration {
        duration,
        duration_type,
        allowed: duration_type
            .options()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn labels_use_singular_for_one() {
        assert_eq!(DurationType::Weeks.label(1), "1 Week");
        assert_eq!(DurationType::Months.label(3), "3 Months");
        assert_eq!(DurationType::Year.label(2), "2 Years");
        assert_eq!(DurationType::Days.label(1), "1 Day");
    }

    #[test]
    fn durations_outside_options_are_rejected() {
        assert!(AutoClearSchedule::new(DurationType::Months, 8).is_ok());
        let Err(err) = AutoClearSchedule::new(DurationType::Months, 2) else {
            panic!("two months is not offered");
        };
        assert!(err.to_string().contains("1, 3, 6, 8"));
        assert!(AutoClearSchedule::new(DurationType::Days, 7).is_err());
    }

    #[test]
    fn switching_type_resets_duration() -> Result<(), AutoClearError> {
        let mut schedule = AutoClearSchedule::new(DurationType::Days, 5)?;
        schedule.set_duration_type(DurationType::Year);
        assert_eq!(schedule.duration(), 1);
        assert_eq!(schedule.label(), "1 Year");
        Ok(())
    }

    #[test]
    fn retention_and_expiry() -> Result<(), AutoClearError> {
        let now = datetime!(2024-03-31 12:00 UTC);
        let schedule = AutoClearSchedule::new(DurationType::Weeks, 2)?;
        assert_eq!(schedule.retention(), Duration::days(14));
        assert_eq!(schedule.cutoff(now), datetime!(2024-03-17 12:00 UTC));
        assert!(schedule.is_expired(datetime!(2024-03-17 11:59 UTC), now));
        assert!(!schedule.is_expired(datetime!(2024-03-17 12:00 UTC), now));

        let yearly = AutoClearSchedule::new(DurationType::Year, 1)?;
        assert_eq!(yearly.retention(), Duration::days(365));
        Ok(())
    }

    #[test]
    fn duration_type_parses_case_insensitively() {
        assert_eq!("Months".parse::<DurationType>(), Ok(DurationType::Months));
        assert!("fortnight".parse::<DurationType>().is_err());
    }
}
