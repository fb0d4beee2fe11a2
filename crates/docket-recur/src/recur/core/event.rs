//! Base events and the instances materialized from them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use docket_core::constants::{INSTANCE_ID_SEPARATOR, INSTANCE_PREFIX_SEPARATOR};
use serde::{Deserialize, Serialize};

/// Opaque event fields copied verbatim onto every instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    /// Honoured by renderers; expansion does not interpret it.
    #[serde(default)]
    pub all_day: bool,
    /// Any further stored field.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The template occurrence of a series. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl BaseEvent {
    /// Creates a base event with an empty payload.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            payload: EventPayload::default(),
        }
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Length of every occurrence of this event.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns true when `start <= end`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// ## Summary
    /// Materializes occurrence `index` of this event starting at `start`.
    ///
    /// The instance keeps the base duration and payload; only the timing,
    /// the instance id and the recurrence marker differ from the base.
    #[must_use]
    pub fn materialize(
        &self,
        index: u64,
        start: DateTime<Utc>,
        prefix: Option<&str>,
    ) -> EventInstance {
        EventInstance {
            instance_id: InstanceId::new(prefix, &self.id, index),
            base_id: self.id.clone(),
            occurrence_index: index,
            title: self.title.clone(),
            start,
            end: start + self.duration(),
            payload: self.payload.clone(),
            is_recurrence: index > 0,
        }
    }
}

/// Deterministic identifier of one occurrence of a base event.
///
/// Formatted as `{base_id}_{index}`, or `{prefix}-{base_id}_{index}` when a
/// prefix is supplied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    #[must_use]
    pub fn new(prefix: Option<&str>, base_id: &str, index: u64) -> Self {
        let id = match prefix {
            Some(prefix) => format!(
                "{prefix}{INSTANCE_PREFIX_SEPARATOR}{base_id}{INSTANCE_ID_SEPARATOR}{index}"
            ),
            None => format!("{base_id}{INSTANCE_ID_SEPARATOR}{index}"),
        };
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A materialized, renderable occurrence of a base event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInstance {
    pub instance_id: InstanceId,
    pub base_id: String,
    /// Position in the series; 0 is the base event's own occurrence.
    pub occurrence_index: u64,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
    /// False for the base occurrence, true for generated repeats.
    pub is_recurrence: bool,
}

impl EventInstance {
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}
