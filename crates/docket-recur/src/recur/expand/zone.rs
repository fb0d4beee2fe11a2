//! Wall-clock to instant conversion.

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Returns the wall-clock time of `instant` in `tz`.
pub(super) fn to_local(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// ## Summary
/// Converts a local wall-clock time in `tz` to an instant.
///
/// Ambiguous times (DST fold) resolve to the first occurrence. Non-existent
/// times (DST gap) are read with the offset in force a day earlier, before
/// the gap opened, which moves them forward by the length of the gap.
pub(super) fn to_instant(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = local.checked_sub_signed(TimeDelta::days(1)).unwrap_or(local);
            let offset = tz.offset_from_utc_datetime(&before_gap).fix();
            let shifted = local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
            Utc.from_utc_datetime(&shifted)
        }
    }
}
