//! Window-bounded expansion of a recurring event.

use std::ops::ControlFlow;

use chrono::{DateTime, Utc};

use super::ExpansionError;
use super::cursor::{Cursor, Occurrence};
use super::options::{BaseOccurrence, ExpansionOptions};
use crate::recur::core::{BaseEvent, EndCondition, EventInstance, RecurrenceRule, TimeWindow};

/// How a walk over the series ended.
enum Walk {
    /// A stop condition or the end of the calendar was reached.
    Finished,
    /// The iteration ceiling was reached first.
    Exhausted,
}

/// ## Summary
/// Expands recurrence rules into event instances.
///
/// The expander holds only its options; every call is independent, so one
/// expander can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct RecurrenceExpander {
    options: ExpansionOptions,
}

impl RecurrenceExpander {
    /// Creates a new recurrence expander.
    #[must_use]
    pub const fn new(options: ExpansionOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ExpansionOptions {
        &self.options
    }

    /// ## Summary
    /// Materializes the instances of `base` under `rule` that overlap `window`.
    ///
    /// Instances come back in strictly increasing start order. The base
    /// occurrence is part of the output unless the options say
    /// [`BaseOccurrence::Exclude`]; it counts toward `After(n)` either way.
    /// `instance_id_prefix` is prepended to every instance id.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The rule is structurally invalid (`InvalidRule`), before any work
    /// - The base event ends before it starts (`InvalidEvent`)
    /// - The iteration ceiling is reached first (`RecurrenceOverflow`, with
    ///   the instances found so far)
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(event_id = %base.id, frequency = %rule.frequency, interval = rule.interval)
    )]
    pub fn expand(
        &self,
        base: &BaseEvent,
        rule: &RecurrenceRule,
        window: TimeWindow,
        instance_id_prefix: Option<&str>,
    ) -> Result<Vec<EventInstance>, ExpansionError> {
        check_inputs(base, rule)?;

        if window.is_empty() {
            tracing::debug!("Empty window, nothing to expand");
            return Ok(Vec::new());
        }

        let mut instances = Vec::new();
        let walk = self.walk(
            base,
            rule,
            |occurrence| occurrence.start >= window.end,
            |occurrence| {
                if window.overlaps(occurrence.start, occurrence.end) && self.returns(occurrence) {
                    instances.push(base.materialize(
                        occurrence.index,
                        occurrence.start,
                        instance_id_prefix,
                    ));
                }
            },
        );

        match walk {
            Walk::Finished => {
                tracing::debug!(count = instances.len(), "Expanded recurring event");
                Ok(instances)
            }
            Walk::Exhausted => Err(self.overflow(instances)),
        }
    }

    /// ## Summary
    /// Returns the first `limit` occurrences of the series, ignoring any
    /// window. End conditions still apply, so fewer may come back.
    ///
    /// The list always starts at the base occurrence (index 0), whatever the
    /// [`BaseOccurrence`] option says.
    ///
    /// ## Errors
    ///
    /// Same as [`Self::expand`]; an overflow carries the occurrences found so
    /// far as instances.
    #[tracing::instrument(level = "debug", skip_all, fields(event_id = %base.id, limit = limit))]
    pub fn occurrences(
        &self,
        base: &BaseEvent,
        rule: &RecurrenceRule,
        limit: usize,
    ) -> Result<Vec<Occurrence>, ExpansionError> {
        check_inputs(base, rule)?;

        let limit = u64::try_from(limit).unwrap_or(u64::MAX);
        let mut occurrences = Vec::new();
        let walk = self.walk(
            base,
            rule,
            |occurrence| occurrence.index >= limit,
            |occurrence| occurrences.push(*occurrence),
        );

        match walk {
            Walk::Finished => Ok(occurrences),
            Walk::Exhausted => Err(self.overflow(
                occurrences
                    .iter()
                    .map(|occurrence| base.materialize(occurrence.index, occurrence.start, None))
                    .collect(),
            )),
        }
    }

    /// ## Summary
    /// Returns the end of the last occurrence of a finite series.
    ///
    /// `None` when the rule never ends, or when its end date precedes the
    /// base occurrence so the series is empty.
    ///
    /// ## Errors
    ///
    /// Same as [`Self::expand`]. A finite series longer than the iteration
    /// ceiling reports `RecurrenceOverflow`.
    #[tracing::instrument(level = "debug", skip_all, fields(event_id = %base.id))]
    pub fn series_end(
        &self,
        base: &BaseEvent,
        rule: &RecurrenceRule,
    ) -> Result<Option<DateTime<Utc>>, ExpansionError> {
        check_inputs(base, rule)?;

        if rule.end == EndCondition::Never {
            return Ok(None);
        }

        let mut last_end = None;
        match self.walk(base, rule, |_| false, |occurrence| last_end = Some(occurrence.end)) {
            Walk::Finished => Ok(last_end),
            Walk::Exhausted => Err(self.overflow(Vec::new())),
        }
    }

    /// Drives the cursor through the series.
    ///
    /// Per candidate, in order: the `On` end date, the `After` count and the
    /// caller's `stop` predicate end the walk; then the iteration ceiling
    /// is checked; then `visit` sees the candidate and it is counted.
    fn walk(
        &self,
        base: &BaseEvent,
        rule: &RecurrenceRule,
        stop: impl Fn(&Occurrence) -> bool,
        mut visit: impl FnMut(&Occurrence),
    ) -> Walk {
        let ceiling = u64::try_from(self.options.max_iterations).unwrap_or(u64::MAX);
        let mut generated: u64 = 0;

        let flow = Cursor::new(base, rule, &self.options).try_for_each(|occurrence| {
            let past_end = match rule.end {
                EndCondition::Never => false,
                EndCondition::After(limit) => generated >= u64::from(limit),
                EndCondition::On(end_date) => occurrence.date > end_date,
            };
            if past_end || stop(&occurrence) {
                return ControlFlow::Break(Walk::Finished);
            }

            if generated >= ceiling {
                tracing::debug!(ceiling, "Recurrence iteration ceiling reached");
                return ControlFlow::Break(Walk::Exhausted);
            }

            tracing::trace!(index = occurrence.index, start = %occurrence.start, "Candidate occurrence");
            visit(&occurrence);
            generated += 1;

            ControlFlow::Continue(())
        });

        match flow {
            ControlFlow::Break(walk) => walk,
            ControlFlow::Continue(()) => Walk::Finished,
        }
    }

    fn returns(&self, occurrence: &Occurrence) -> bool {
        occurrence.index > 0 || self.options.base_occurrence == BaseOccurrence::Include
    }

    fn overflow(&self, partial: Vec<EventInstance>) -> ExpansionError {
        ExpansionError::RecurrenceOverflow {
            ceiling: self.options.max_iterations,
            partial,
        }
    }
}

fn check_inputs(base: &BaseEvent, rule: &RecurrenceRule) -> Result<(), ExpansionError> {
    rule.validate()?;

    if !base.is_well_formed() {
        return Err(ExpansionError::InvalidEvent(format!(
            "event '{}' ends before it starts",
            base.id
        )));
    }

    Ok(())
}

/// ## Summary
/// Expands `base` under `rule` into the instances overlapping
/// `[window_start, window_end)`, using default [`ExpansionOptions`].
///
/// ## Errors
///
/// See [`RecurrenceExpander::expand`].
pub fn expand(
    base: &BaseEvent,
    rule: &RecurrenceRule,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    instance_id_prefix: Option<&str>,
) -> Result<Vec<EventInstance>, ExpansionError> {
    RecurrenceExpander::default().expand(
        base,
        rule,
        TimeWindow::new(window_start, window_end),
        instance_id_prefix,
    )
}
