//! Caller-facing expansion settings.

use std::str::FromStr;

use chrono_tz::Tz;
use docket_core::config::RecurrenceConfig;
use docket_core::constants::DEFAULT_MAX_ITERATIONS;
use docket_core::error::{CoreError, CoreResult};

use crate::recur::core::Weekday;

/// Whether the base event's own occurrence (index 0) is returned.
///
/// Either way the base occurrence counts toward an `After(n)` end condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseOccurrence {
    /// Return the base occurrence like any other when it overlaps the window.
    #[default]
    Include,
    /// Never return the base occurrence; the caller renders the original.
    Exclude,
}

impl BaseOccurrence {
    #[must_use]
    pub const fn from_flag(include: bool) -> Self {
        if include { Self::Include } else { Self::Exclude }
    }
}

/// Options for recurrence expansion.
#[derive(Debug, Clone)]
pub struct ExpansionOptions {
    /// Candidate occurrences considered before reporting overflow.
    pub max_iterations: usize,

    pub base_occurrence: BaseOccurrence,

    /// Zone whose wall clock the series follows.
    pub timezone: Tz,

    /// First day of a week group for weekly rules with weekdays.
    pub week_start: Weekday,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            base_occurrence: BaseOccurrence::Include,
            timezone: Tz::UTC,
            week_start: Weekday::Sunday,
        }
    }
}

impl ExpansionOptions {
    /// Sets the iteration ceiling.
    #[must_use]
    pub const fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    #[must_use]
    pub const fn with_base_occurrence(mut self, base_occurrence: BaseOccurrence) -> Self {
        self.base_occurrence = base_occurrence;
        self
    }

    #[must_use]
    pub const fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    #[must_use]
    pub const fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }
}

impl TryFrom<&RecurrenceConfig> for ExpansionOptions {
    type Error = CoreError;

    fn try_from(config: &RecurrenceConfig) -> CoreResult<Self> {
        if config.max_iterations == 0 {
            return Err(CoreError::InvalidConfiguration(
                "recurrence.max_iterations must be positive".to_string(),
            ));
        }

        let timezone = Tz::from_str(config.timezone.trim()).map_err(|err| {
            CoreError::InvalidConfiguration(format!(
                "Unknown timezone '{}': {err}",
                config.timezone
            ))
        })?;

        let week_start = Weekday::parse(&config.week_start).ok_or_else(|| {
            CoreError::InvalidConfiguration(format!(
                "Unknown week start '{}'",
                config.week_start
            ))
        })?;

        Ok(Self {
            max_iterations: config.max_iterations,
            base_occurrence: BaseOccurrence::from_flag(config.include_base_occurrence),
            timezone,
            week_start,
        })
    }
}
