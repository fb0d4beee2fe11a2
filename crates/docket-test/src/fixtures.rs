//! Shared builders for test events, rules and windows.

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use docket_recur::{BaseEvent, EventInstance, EventPayload, TimeWindow};

/// UTC instant from calendar fields.
///
/// # Panics
/// Panics on an invalid date or time.
#[must_use]
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture time {year}-{month}-{day} {hour}:{minute}"))
}

/// # Panics
/// Panics on an invalid date.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

/// A base event starting at `start` and lasting `minutes`.
#[must_use]
pub fn event(id: &str, start: DateTime<Utc>, minutes: i64) -> BaseEvent {
    BaseEvent::new(id, format!("Event {id}"), start, start + TimeDelta::minutes(minutes))
}

/// A base event with a payload that every instance should carry.
#[must_use]
pub fn hearing(id: &str, start: DateTime<Utc>, minutes: i64) -> BaseEvent {
    event(id, start, minutes).with_payload(EventPayload {
        description: Some("Status hearing".to_string()),
        location: Some("Courtroom 3B".to_string()),
        category: Some("court".to_string()),
        calendar_id: Some("litigation".to_string()),
        ..EventPayload::default()
    })
}

/// The whole of a calendar month, in UTC.
#[must_use]
pub fn month(year: i32, month: u32) -> TimeWindow {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    TimeWindow::new(utc(year, month, 1, 0, 0), utc(next_year, next_month, 1, 0, 0))
}

/// Start dates of `instances`, in order.
#[must_use]
pub fn start_dates(instances: &[EventInstance]) -> Vec<NaiveDate> {
    instances
        .iter()
        .map(|instance| instance.start.date_naive())
        .collect()
}

/// Occurrence indices of `instances`, in order.
#[must_use]
pub fn indices(instances: &[EventInstance]) -> Vec<u64> {
    instances
        .iter()
        .map(|instance| instance.occurrence_index)
        .collect()
}
