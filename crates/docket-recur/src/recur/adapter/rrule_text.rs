//! RFC 5545 `RRULE` text as a stored rule format.
//!
//! Parsing is delegated to the `rrule` crate; only the parts the expander
//! models are carried over, and anything it cannot honour is rejected.

use chrono::Utc;
use rrule::{NWeekday, RRule, Unvalidated};

use crate::recur::core::{EndCondition, Frequency, RecurrenceRule, RuleError, Weekday};

/// ## Summary
/// Parses `FREQ=...;...` text (optionally prefixed with `RRULE:`) into a
/// recurrence rule.
///
/// ## Errors
///
/// Returns an error if:
/// - The text is not a valid RRULE
/// - The frequency is finer than daily
/// - It uses a part other than `FREQ`, `INTERVAL`, `COUNT`, `UNTIL`,
///   `BYDAY` (weekly only) and `BYMONTHDAY` (monthly only)
/// - It uses ordinal weekdays (`2MO`) or several/negative month days
/// - It sets both `COUNT` and `UNTIL`
pub(super) fn parse(text: &str) -> Result<RecurrenceRule, RuleError> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix("RRULE:").unwrap_or(trimmed);

    let parsed = body
        .parse::<RRule<Unvalidated>>()
        .map_err(|err| RuleError::Unparseable(err.to_string()))?;
    tracing::trace!(rrule = %body, "Parsed RRULE text");

    let frequency = match parsed.get_freq() {
        rrule::Frequency::Daily => Frequency::Daily,
        rrule::Frequency::Weekly => Frequency::Weekly,
        rrule::Frequency::Monthly => Frequency::Monthly,
        rrule::Frequency::Yearly => Frequency::Yearly,
        other => return Err(RuleError::UnknownFrequency(format!("{other:?}"))),
    };

    check_parts(body, frequency)?;

    let mut rule = RecurrenceRule::new(frequency).with_interval(u32::from(parsed.get_interval()));

    let weekdays = parsed
        .get_by_weekday()
        .iter()
        .map(|nweekday| match nweekday {
            NWeekday::Every(day) => Ok(Weekday::from(*day)),
            NWeekday::Nth(n, day) => Err(RuleError::Unparseable(format!(
                "ordinal weekday {n}{day} is not supported"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    if !weekdays.is_empty() {
        rule = rule.with_weekdays(weekdays);
    }

    match parsed.get_by_month_day() {
        [] => {}
        [day] => {
            let day = u8::try_from(*day)
                .map_err(|_err| RuleError::MonthDayOutOfRange(i64::from(*day)))?;
            rule = rule.with_month_day(day);
        }
        days => {
            return Err(RuleError::Unparseable(format!(
                "{} month days given, at most one is supported",
                days.len()
            )));
        }
    }

    rule.end = match (parsed.get_count(), parsed.get_until()) {
        (Some(_), Some(_)) => return Err(RuleError::ConflictingEndConditions),
        (Some(count), None) => EndCondition::After(count),
        (None, Some(until)) => EndCondition::On(until.with_timezone(&Utc).date_naive()),
        (None, None) => EndCondition::Never,
    };

    rule.validate()?;
    Ok(rule)
}

/// Rejects rule parts the model would otherwise drop.
fn check_parts(body: &str, frequency: Frequency) -> Result<(), RuleError> {
    for part in body.split(';').filter(|part| !part.trim().is_empty()) {
        let name = part
            .split_once('=')
            .map_or(part, |(name, _)| name)
            .trim()
            .to_ascii_uppercase();

        let supported = match name.as_str() {
            "FREQ" | "INTERVAL" | "COUNT" | "UNTIL" => true,
            "BYDAY" => frequency == Frequency::Weekly,
            "BYMONTHDAY" => frequency == Frequency::Monthly,
            _ => false,
        };
        if !supported {
            return Err(RuleError::Unparseable(format!(
                "{name} is not supported on a {frequency} rule"
            )));
        }
    }
    Ok(())
}
