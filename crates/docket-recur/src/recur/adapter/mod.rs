//! Stored event records to recurrence model types.
//!
//! Events arrive from the hosted backend as JSON with camelCase fields and
//! ISO-8601 timestamps. A stored rule may be an object, a JSON-encoded string
//! of that object, or RFC 5545 `RRULE` text.

mod rrule_text;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recur::core::{BaseEvent, EventPayload, Frequency, RecurrenceRule, RuleError, Weekday};

/// Error converting stored records into the model.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Malformed event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Event '{event_id}' has an invalid {field}: '{value}'")]
    InvalidTimestamp {
        event_id: String,
        field: &'static str,
        value: String,
    },

    #[error("Event '{event_id}' has an invalid recurrence rule")]
    InvalidRule {
        event_id: String,
        #[source]
        source: RuleError,
    },
}

impl AdapterError {
    /// Id of the event the error belongs to, when known.
    #[must_use]
    pub fn event_id(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::InvalidTimestamp { event_id, .. } | Self::InvalidRule { event_id, .. } => {
                Some(event_id)
            }
        }
    }
}

/// An event record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<StoredRuleField>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

/// The shapes a stored `recurrenceRule` field comes in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredRuleField {
    Structured(StoredRule),
    /// Either a JSON-encoded [`StoredRule`] or `RRULE` text.
    Encoded(String),
}

/// A stored rule object.
///
/// Integer fields are read wide and signed so out-of-range values surface as
/// [`RuleError`]s instead of deserialization failures.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRule {
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<i64>,
}

impl StoredRule {
    /// ## Summary
    /// Converts the stored object into a validated rule.
    ///
    /// ## Errors
    /// Returns the first [`RuleError`] found. A blank `endDate` counts as
    /// absent.
    pub fn to_rule(&self) -> Result<RecurrenceRule, RuleError> {
        let frequency = Frequency::parse(&self.frequency)
            .ok_or_else(|| RuleError::UnknownFrequency(self.frequency.clone()))?;

        let interval = match self.interval {
            None => 1,
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|interval| *interval >= 1)
                .ok_or(RuleError::InvalidInterval(value))?,
        };

        let mut rule = RecurrenceRule::new(frequency).with_interval(interval);

        if let Some(indices) = &self.weekdays {
            let weekdays = indices
                .iter()
                .map(|index| Weekday::from_index(*index))
                .collect::<Result<Vec<_>, _>>()?;
            if !weekdays.is_empty() {
                rule = rule.with_weekdays(weekdays);
            }
        }

        if let Some(value) = self.month_day {
            let day = u8::try_from(value)
                .ok()
                .filter(|day| (1..=31).contains(day))
                .ok_or(RuleError::MonthDayOutOfRange(value))?;
            rule = rule.with_month_day(day);
        }

        let end_date = self
            .end_date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty());

        rule = match (end_date, self.occurrences) {
            (Some(_), Some(_)) => return Err(RuleError::ConflictingEndConditions),
            (Some(date), None) => rule.until(parse_end_date(date)?),
            (None, Some(count)) => rule.count(
                u32::try_from(count)
                    .ok()
                    .filter(|count| *count >= 1)
                    .ok_or(RuleError::InvalidOccurrenceCount(count))?,
            ),
            (None, None) => rule,
        };

        rule.validate()?;
        Ok(rule)
    }
}

impl StoredRuleField {
    /// ## Summary
    /// Decodes whichever stored shape this is into a validated rule.
    ///
    /// ## Errors
    /// Returns a [`RuleError`] for invalid rules, and
    /// `RuleError::Unparseable` for strings that are neither JSON nor RRULE.
    pub fn to_rule(&self) -> Result<RecurrenceRule, RuleError> {
        match self {
            Self::Structured(stored) => stored.to_rule(),
            Self::Encoded(text) if text.trim_start().starts_with('{') => {
                serde_json::from_str::<StoredRule>(text)
                    .map_err(|err| RuleError::Unparseable(err.to_string()))?
                    .to_rule()
            }
            Self::Encoded(text) => rrule_text::parse(text),
        }
    }
}

impl StoredEvent {
    /// ## Summary
    /// Converts the record into a base event and its rule, if it has one.
    ///
    /// An absent, `null` or blank `recurrenceRule` means a single event.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - `startTime` or `endTime` is not a timestamp
    /// - The recurrence rule is invalid
    pub fn into_model(self) -> Result<(BaseEvent, Option<RecurrenceRule>), AdapterError> {
        let start = parse_timestamp(&self.start_time).ok_or_else(|| {
            AdapterError::InvalidTimestamp {
                event_id: self.id.clone(),
                field: "startTime",
                value: self.start_time.clone(),
            }
        })?;
        let end = parse_timestamp(&self.end_time).ok_or_else(|| {
            AdapterError::InvalidTimestamp {
                event_id: self.id.clone(),
                field: "endTime",
                value: self.end_time.clone(),
            }
        })?;

        let rule = match &self.recurrence_rule {
            Some(StoredRuleField::Encoded(text)) if text.trim().is_empty() => None,
            Some(field) => Some(field.to_rule().map_err(|source| AdapterError::InvalidRule {
                event_id: self.id.clone(),
                source,
            })?),
            None => None,
        };

        let base = BaseEvent::new(self.id, self.title, start, end).with_payload(self.payload);
        Ok((base, rule))
    }
}

/// ## Summary
/// Parses a JSON array of stored events.
///
/// ## Errors
/// Returns `AdapterError::Json` if the document is not an array of event
/// records.
#[tracing::instrument(level = "debug", skip(json), fields(json_len = json.len()))]
pub fn parse_events(json: &str) -> Result<Vec<StoredEvent>, AdapterError> {
    let events: Vec<StoredEvent> = serde_json::from_str(json)?;
    tracing::debug!(count = events.len(), "Parsed stored events");
    Ok(events)
}

/// Parses an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` (read as
/// UTC) or a bare date (midnight UTC).
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Parses an end date: `YYYY-MM-DD`, or the UTC date of a timestamp.
fn parse_end_date(value: &str) -> Result<NaiveDate, RuleError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(value).map(|dt| dt.date_naive()))
        .ok_or_else(|| RuleError::MalformedEndDate(value.to_string()))
}
