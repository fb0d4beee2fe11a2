//! Recurrence rule value types.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structural problems with a recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Interval must be a positive step count.
    #[error("Interval must be at least 1, got {0}")]
    InvalidInterval(i64),

    /// Weekday index outside 0 (Sunday) ..= 6 (Saturday).
    #[error("Weekday index must be between 0 and 6, got {0}")]
    WeekdayOutOfRange(i64),

    /// Day of month outside 1..=31.
    #[error("Day of month must be between 1 and 31, got {0}")]
    MonthDayOutOfRange(i64),

    /// `After` end condition with a non-positive count.
    #[error("Occurrence count must be at least 1, got {0}")]
    InvalidOccurrenceCount(i64),

    /// Both an end date and an occurrence count were given.
    #[error("Rule sets both an end date and an occurrence count")]
    ConflictingEndConditions,

    /// Frequency name not recognised or not supported.
    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),

    /// End date that is not a calendar date.
    #[error("Malformed end date: {0}")]
    MalformedEndDate(String),

    /// Rule text that could not be parsed at all.
    #[error("Unparseable rule: {0}")]
    Unparseable(String),
}

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => return None,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week, ordered and indexed from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Returns the weekday index (0 = Sunday).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    /// ## Summary
    /// Builds a weekday from its index (0 = Sunday).
    ///
    /// ## Errors
    /// Returns `RuleError::WeekdayOutOfRange` for indices outside 0..=6.
    pub fn from_index(index: i64) -> Result<Self, RuleError> {
        Self::all()
            .into_iter()
            .find(|day| i64::from(day.index()) == index)
            .ok_or(RuleError::WeekdayOutOfRange(index))
    }

    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Parses a weekday from a two-letter abbreviation or its English name
    /// (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_uppercase().as_str() {
            "SU" | "SUNDAY" => Self::Sunday,
            "MO" | "MONDAY" => Self::Monday,
            "TU" | "TUESDAY" => Self::Tuesday,
            "WE" | "WEDNESDAY" => Self::Wednesday,
            "TH" | "THURSDAY" => Self::Thursday,
            "FR" | "FRIDAY" => Self::Friday,
            "SA" | "SATURDAY" => Self::Saturday,
            _ => return None,
        })
    }

    /// Returns all weekdays in order (Sunday through Saturday).
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Sunday,
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
        ]
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(wd: chrono::Weekday) -> Self {
        match wd {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a series ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum EndCondition {
    /// The series repeats without bound.
    #[default]
    Never,
    /// The series has this many occurrences, the base occurrence included.
    After(u32),
    /// The series ends on this date (inclusive); occurrences starting on a
    /// later date are excluded.
    On(NaiveDate),
}

/// Recurrence rule.
///
/// Defines how a base event repeats. `weekdays` only applies to weekly rules
/// and `month_day` only to monthly rules; either is ignored elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,

    /// Step count between occurrences (default: 1).
    #[serde(default = "default_interval")]
    pub interval: u32,

    /// Weekdays a weekly series lands on instead of the base event's weekday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<BTreeSet<Weekday>>,

    /// Day of month a monthly series is pinned to instead of the base event's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_day: Option<u8>,

    #[serde(default)]
    pub end: EndCondition,
}

const fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    /// Creates a rule repeating every `frequency` step, forever.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            weekdays: None,
            month_day: None,
            end: EndCondition::Never,
        }
    }

    #[must_use]
    pub const fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    #[must_use]
    pub const fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    #[must_use]
    pub const fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    #[must_use]
    pub const fn yearly() -> Self {
        Self::new(Frequency::Yearly)
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the weekday constraint.
    #[must_use]
    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays = Some(weekdays.into_iter().collect());
        self
    }

    /// Sets the day-of-month constraint.
    #[must_use]
    pub fn with_month_day(mut self, month_day: u8) -> Self {
        self.month_day = Some(month_day);
        self
    }

    /// Sets the end condition.
    #[must_use]
    pub fn with_end(mut self, end: EndCondition) -> Self {
        self.end = end;
        self
    }

    /// Ends the series after `occurrences` occurrences.
    #[must_use]
    pub fn count(self, occurrences: u32) -> Self {
        self.with_end(EndCondition::After(occurrences))
    }

    /// Ends the series on `date` (inclusive).
    #[must_use]
    pub fn until(self, date: NaiveDate) -> Self {
        self.with_end(EndCondition::On(date))
    }

    /// ## Summary
    /// Checks the rule's structural invariants.
    ///
    /// ## Errors
    /// Returns the first violated invariant: a zero interval, a day of month
    /// outside 1..=31 or an `After` count of zero.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.interval == 0 {
            return Err(RuleError::InvalidInterval(0));
        }

        if let Some(day) = self.month_day.filter(|day| !(1..=31).contains(day)) {
            return Err(RuleError::MonthDayOutOfRange(i64::from(day)));
        }

        if self.end == EndCondition::After(0) {
            return Err(RuleError::InvalidOccurrenceCount(0));
        }

        Ok(())
    }

    /// Returns the weekday constraint that applies to expansion, if any.
    ///
    /// Empty sets and sets on non-weekly rules impose no constraint.
    #[must_use]
    pub fn effective_weekdays(&self) -> Option<&BTreeSet<Weekday>> {
        self.weekdays
            .as_ref()
            .filter(|days| self.frequency == Frequency::Weekly && !days.is_empty())
    }

    /// Returns the day-of-month constraint that applies to expansion, if any.
    #[must_use]
    pub fn effective_month_day(&self) -> Option<u8> {
        self.month_day
            .filter(|_| self.frequency == Frequency::Monthly)
    }
}
