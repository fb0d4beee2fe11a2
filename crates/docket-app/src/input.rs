//! Command line inputs: event files, window bounds and expansion options.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use docket_core::config::Settings;
use docket_recur::ExpansionOptions;
use docket_recur::error::RecurError;
use docket_recur::recur::adapter::{StoredEvent, parse_events};

use crate::error::{AppError, AppResult};

/// ## Summary
/// Reads a JSON array of stored events from `path`.
///
/// ## Errors
/// Returns an error if the file cannot be read or is not an event array.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_events(path: &Path) -> AppResult<Vec<StoredEvent>> {
    let json = std::fs::read_to_string(path)?;
    Ok(parse_events(&json).map_err(RecurError::from)?)
}

/// ## Summary
/// Parses a window bound given as an RFC 3339 timestamp or a plain date
/// (midnight UTC).
///
/// ## Errors
/// Returns `AppError::InvalidArgument` for anything else.
pub fn parse_instant(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::InvalidArgument(format!("'{value}' is not a date or timestamp")))
}

/// ## Summary
/// Builds expansion options from settings, with an optional zone override.
///
/// ## Errors
/// Returns an error if the settings or the override name an unknown zone or
/// week start.
pub fn expansion_options(settings: &Settings, timezone: Option<&str>) -> AppResult<ExpansionOptions> {
    let options = ExpansionOptions::try_from(&settings.recurrence)?;

    match timezone {
        Some(name) => {
            let tz = Tz::from_str(name)
                .map_err(|err| AppError::InvalidArgument(format!("Unknown timezone '{name}': {err}")))?;
            Ok(options.with_timezone(tz))
        }
        None => Ok(options),
    }
}
