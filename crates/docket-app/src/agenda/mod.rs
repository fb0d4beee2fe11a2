//! Merges the instances of many stored events into one agenda.
//!
//! One bad event never sinks the agenda: its problem becomes a [`Notice`] and
//! the remaining events are still expanded.

use docket_recur::recur::adapter::{AdapterError, StoredEvent};
use docket_recur::{EventInstance, ExpansionError, RecurrenceExpander, TimeWindow};
use serde::Serialize;

/// What went wrong with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    /// The stored record could not be read (bad timestamp).
    InvalidRecord,
    /// The recurrence rule is invalid; the event was skipped.
    InvalidRule,
    /// The event ends before it starts; the event was skipped.
    InvalidEvent,
    /// The series hit the iteration ceiling; its partial instances are kept.
    Overflow,
}

/// A per-event warning shown alongside the agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub event_id: String,
    pub kind: NoticeKind,
    pub message: String,
}

/// Instances of all events plus the notices raised while building them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaReport {
    pub instances: Vec<EventInstance>,
    pub notices: Vec<Notice>,
}

impl AgendaReport {
    fn warn(&mut self, event_id: &str, kind: NoticeKind, message: String) {
        tracing::warn!(event_id, kind = ?kind, %message, "Event needs attention");
        self.notices.push(Notice {
            event_id: event_id.to_string(),
            kind,
            message,
        });
    }

    fn record_adapter_error(&mut self, event_id: &str, err: &AdapterError) {
        let kind = match err {
            AdapterError::InvalidRule { .. } => NoticeKind::InvalidRule,
            AdapterError::InvalidTimestamp { .. } | AdapterError::Json(_) => {
                NoticeKind::InvalidRecord
            }
        };
        self.warn(event_id, kind, error_chain(err));
    }

    /// Records an expansion failure, keeping any partial instances.
    fn record_expansion_error(&mut self, event_id: &str, err: ExpansionError) {
        let kind = match &err {
            ExpansionError::InvalidRule(_) => NoticeKind::InvalidRule,
            ExpansionError::InvalidEvent(_) => NoticeKind::InvalidEvent,
            ExpansionError::RecurrenceOverflow { .. } => NoticeKind::Overflow,
        };
        self.warn(event_id, kind, err.to_string());

        if let ExpansionError::RecurrenceOverflow { partial, .. } = err {
            self.instances.extend(partial);
        }
    }

    /// Orders instances by start, then instance id.
    fn finish(mut self) -> Self {
        self.instances.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.instance_id.cmp(&b.instance_id))
        });
        self
    }
}

/// ## Summary
/// Builds the agenda for `window` from stored events.
///
/// Recurring events are expanded; a single event becomes one index-0
/// instance when it overlaps the window, just as the expander treats a base
/// occurrence.
#[tracing::instrument(level = "debug", skip_all, fields(events = events.len()))]
pub fn collect_window(
    expander: &RecurrenceExpander,
    events: Vec<StoredEvent>,
    window: TimeWindow,
    instance_id_prefix: Option<&str>,
) -> AgendaReport {
    let mut report = AgendaReport::default();

    for event in events {
        let event_id = event.id.clone();
        let (base, rule) = match event.into_model() {
            Ok(model) => model,
            Err(err) => {
                report.record_adapter_error(&event_id, &err);
                continue;
            }
        };

        match rule {
            Some(rule) => match expander.expand(&base, &rule, window, instance_id_prefix) {
                Ok(instances) => report.instances.extend(instances),
                Err(err) => report.record_expansion_error(&event_id, err),
            },
            None if !base.is_well_formed() => report.warn(
                &event_id,
                NoticeKind::InvalidEvent,
                format!("Event ends ({}) before it starts ({})", base.end, base.start),
            ),
            None => {
                if window.overlaps(base.start, base.end) {
                    report
                        .instances
                        .push(base.materialize(0, base.start, instance_id_prefix));
                }
            }
        }
    }

    let report = report.finish();
    tracing::debug!(
        instances = report.instances.len(),
        notices = report.notices.len(),
        "Agenda built"
    );
    report
}

/// ## Summary
/// Lists the first `limit` occurrences of every recurring event.
///
/// Single events are left out.
#[tracing::instrument(level = "debug", skip_all, fields(events = events.len(), limit = limit))]
pub fn collect_upcoming(
    expander: &RecurrenceExpander,
    events: Vec<StoredEvent>,
    limit: usize,
) -> AgendaReport {
    let mut report = AgendaReport::default();

    for event in events {
        let event_id = event.id.clone();
        let (base, rule) = match event.into_model() {
            Ok((base, Some(rule))) => (base, rule),
            Ok((_, None)) => continue,
            Err(err) => {
                report.record_adapter_error(&event_id, &err);
                continue;
            }
        };

        match expander.occurrences(&base, &rule, limit) {
            Ok(occurrences) => report.instances.extend(
                occurrences
                    .iter()
                    .map(|occurrence| base.materialize(occurrence.index, occurrence.start, None)),
            ),
            Err(err) => report.record_expansion_error(&event_id, err),
        }
    }

    report.finish()
}

/// Renders an error with its sources, outermost first.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
