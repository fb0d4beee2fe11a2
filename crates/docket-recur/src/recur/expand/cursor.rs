//! Occurrence generation.
//!
//! Every occurrence is derived from the base start rather than from the
//! previous occurrence, so day-of-month clamping never drifts: a series
//! anchored on Jan 31 yields Feb 29 and then Mar 31.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use super::options::ExpansionOptions;
use super::zone;
use crate::recur::core::{BaseEvent, Frequency, RecurrenceRule, Weekday};

/// One occurrence of a series, whether or not it falls in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Position in the series; 0 is the base event's own occurrence.
    pub index: u64,
    /// Calendar date of `start` in the expansion zone.
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Walks the occurrences of a series in increasing order.
pub(super) struct Cursor<'a> {
    rule: &'a RecurrenceRule,
    anchor: NaiveDateTime,
    timezone: Tz,
    duration: TimeDelta,
    week_groups: Option<WeekGroups<'a>>,
    /// Next candidate step from the anchor.
    step: u64,
    /// Index the next emitted occurrence gets.
    index: u64,
    last_start: Option<DateTime<Utc>>,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(
        base: &BaseEvent,
        rule: &'a RecurrenceRule,
        options: &ExpansionOptions,
    ) -> Self {
        let anchor = zone::to_local(base.start, options.timezone);
        let week_groups = rule
            .effective_weekdays()
            .map(|days| WeekGroups::new(days, anchor.date(), rule.interval, options.week_start));

        Self {
            rule,
            anchor,
            timezone: options.timezone,
            duration: base.duration(),
            week_groups,
            step: 0,
            index: 0,
            last_start: None,
            exhausted: false,
        }
    }

    /// Local start of candidate `step >= 1`, or `None` once the series
    /// runs past the representable calendar.
    fn local_start(&mut self, step: u64) -> Option<NaiveDateTime> {
        let steps = step.checked_mul(u64::from(self.rule.interval))?;

        match self.rule.frequency {
            Frequency::Daily => self.anchor.checked_add_days(Days::new(steps)),
            Frequency::Weekly => match self.week_groups.as_mut() {
                Some(groups) => groups
                    .next_day()
                    .map(|day| day.and_time(self.anchor.time())),
                None => self
                    .anchor
                    .checked_add_days(Days::new(steps.checked_mul(7)?)),
            },
            Frequency::Monthly => add_months(self.anchor, steps, self.rule.effective_month_day()),
            Frequency::Yearly => add_months(self.anchor, steps.checked_mul(12)?, None),
        }
    }
}

impl Iterator for Cursor<'_> {
    type Item = Occurrence;

    /// Yields occurrences with strictly increasing starts. A candidate whose
    /// local time resolves to an instant already reached (a calendar day
    /// skipped by its zone) is dropped and takes no index.
    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let step = self.step;
            self.step += 1;

            let local = if step == 0 {
                Some(self.anchor)
            } else {
                self.local_start(step)
            };

            let Some((local, start, end)) = local.and_then(|local| {
                let start = zone::to_instant(local, self.timezone);
                let end = start.checked_add_signed(self.duration)?;
                Some((local, start, end))
            }) else {
                self.exhausted = true;
                return None;
            };

            if self.last_start.is_some_and(|last| start <= last) {
                tracing::trace!(step, %start, "Candidate repeats an earlier instant, skipped");
                continue;
            }
            self.last_start = Some(start);

            let occurrence = Occurrence {
                index: self.index,
                date: local.date(),
                start,
                end,
            };
            self.index += 1;
            return Some(occurrence);
        }

        None
    }
}

/// Day-by-day walk for weekly rules with weekdays.
///
/// Weeks are numbered from the `week_start` week containing the base date;
/// only weeks whose number is a multiple of the interval are eligible.
struct WeekGroups<'a> {
    days: &'a BTreeSet<Weekday>,
    week_anchor: NaiveDate,
    interval: i64,
    current: NaiveDate,
}

impl<'a> WeekGroups<'a> {
    fn new(
        days: &'a BTreeSet<Weekday>,
        base_date: NaiveDate,
        interval: u32,
        week_start: Weekday,
    ) -> Self {
        let into_week =
            (7 + u64::from(Weekday::from(base_date.weekday()).index()) - u64::from(week_start.index())) % 7;

        Self {
            days,
            week_anchor: base_date
                .checked_sub_days(Days::new(into_week))
                .unwrap_or(base_date),
            interval: i64::from(interval),
            current: base_date,
        }
    }

    /// Next listed weekday strictly after the previous one, in an eligible week.
    fn next_day(&mut self) -> Option<NaiveDate> {
        loop {
            let mut day = self.current.succ_opt()?;
            let week = (day - self.week_anchor).num_days() / 7;

            if week % self.interval != 0 {
                let eligible = (week / self.interval + 1).checked_mul(self.interval)?;
                let offset = u64::try_from(eligible.checked_mul(7)?).ok()?;
                day = self.week_anchor.checked_add_days(Days::new(offset))?;
            }

            self.current = day;
            if self.days.contains(&Weekday::from(day.weekday())) {
                return Some(day);
            }
        }
    }
}

/// Adds months to a local datetime, pinning the day of month to
/// `pinned_day` when given.
///
/// Days past the end of the target month clamp to its last day
/// (Jan 31 + 1 month = Feb 28/29).
fn add_months(dt: NaiveDateTime, months: u64, pinned_day: Option<u8>) -> Option<NaiveDateTime> {
    let total_months = u64::from(dt.month0()).checked_add(months)?;
    let year = dt.year().checked_add(i32::try_from(total_months / 12).ok()?)?;
    let month = u32::try_from(total_months % 12).ok()? + 1;

    let wanted_day = pinned_day.map_or(dt.day(), u32::from);
    let day = wanted_day.min(days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(dt.time()))
}

/// Returns the number of days in a month.
fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1))
        .map_or(31, |d| d.pred_opt().map_or(31, |p| p.day()))
}
