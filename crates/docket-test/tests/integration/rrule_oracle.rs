//! Cross-checks expansion against the `rrule` crate for rules whose meaning
//! is the same under RFC 5545.

use chrono::{DateTime, Utc};
use docket_recur::recur::adapter::StoredRuleField;
use docket_recur::{BaseEvent, ExpansionOptions, RecurrenceExpander, Weekday};
use rrule::RRuleSet;

struct OracleCase {
    name: &'static str,
    dtstart: &'static str,
    rrule: &'static str,
}

const CASES: &[OracleCase] = &[
    OracleCase {
        name: "daily_interval",
        dtstart: "20240101T090000Z",
        rrule: "FREQ=DAILY;INTERVAL=3;COUNT=5",
    },
    OracleCase {
        name: "biweekly_two_days",
        dtstart: "20240101T090000Z",
        rrule: "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,TH;COUNT=6",
    },
    OracleCase {
        name: "weekdays_until",
        dtstart: "20240101T090000Z",
        rrule: "FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20240110T235959Z",
    },
    OracleCase {
        name: "monthly_mid_month",
        dtstart: "20240115T130000Z",
        rrule: "FREQ=MONTHLY;BYMONTHDAY=15;COUNT=4",
    },
    OracleCase {
        name: "yearly",
        dtstart: "20230310T090000Z",
        rrule: "FREQ=YEARLY;COUNT=3",
    },
];

fn oracle_starts(case: &OracleCase) -> Vec<i64> {
    let set: RRuleSet = format!("DTSTART:{}\nRRULE:{}", case.dtstart, case.rrule)
        .parse()
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", case.name, err));

    set.all(100)
        .dates
        .iter()
        .map(chrono::DateTime::timestamp)
        .collect()
}

fn expander_starts(case: &OracleCase) -> Vec<i64> {
    let start: DateTime<Utc> = chrono::NaiveDateTime::parse_from_str(case.dtstart, "%Y%m%dT%H%M%SZ")
        .unwrap_or_else(|err| panic!("Bad DTSTART in {}: {}", case.name, err))
        .and_utc();
    let base = BaseEvent::new(case.name, case.name, start, start);
    let rule = StoredRuleField::Encoded(case.rrule.to_string())
        .to_rule()
        .unwrap_or_else(|err| panic!("Rule of {} rejected: {}", case.name, err));

    // RFC 5545 weeks start on Monday unless WKST says otherwise.
    let expander =
        RecurrenceExpander::new(ExpansionOptions::default().with_week_start(Weekday::Monday));

    expander
        .occurrences(&base, &rule, 100)
        .unwrap_or_else(|err| panic!("Expansion of {} failed: {}", case.name, err))
        .iter()
        .map(|occurrence| occurrence.start.timestamp())
        .collect()
}

/// ## Summary
/// Every case yields the same start instants as the `rrule` crate.
#[test_log::test]
fn matches_rrule_crate() {
    for case in CASES {
        assert_eq!(
            expander_starts(case),
            oracle_starts(case),
            "Case {} did not match",
            case.name
        );
    }
}
