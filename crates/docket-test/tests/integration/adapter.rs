use docket_recur::recur::adapter::{AdapterError, StoredEvent, parse_events};
use docket_recur::{RecurrenceExpander, RuleError};
use docket_test::fixtures::{date, month, start_dates, utc};

const RECORDS: &str = r#"[
    {
        "id": "retainer",
        "title": "Retainer review",
        "startTime": "2024-01-05T15:00:00Z",
        "endTime": "2024-01-05T15:30:00Z",
        "category": "billing",
        "clientId": "C-204",
        "recurrenceRule": "{\"frequency\":\"monthly\",\"monthDay\":5,\"occurrences\":12}"
    },
    {
        "id": "standup",
        "title": "Associates standup",
        "startTime": "2024-01-01T09:00:00",
        "endTime": "2024-01-01T09:15:00",
        "recurrenceRule": "RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20240112T235959Z"
    },
    {
        "id": "broken",
        "title": "Broken",
        "startTime": "2024-01-01T09:00:00Z",
        "endTime": "2024-01-01T10:00:00Z",
        "recurrenceRule": {"frequency": "fortnightly"}
    }
]"#;

fn record(id: &str) -> StoredEvent {
    parse_events(RECORDS)
        .expect("records should parse")
        .into_iter()
        .find(|event| event.id == id)
        .unwrap_or_else(|| panic!("no record {id}"))
}

#[test_log::test]
fn json_encoded_rule_expands() {
    let (base, rule) = record("retainer").into_model().expect("valid record");
    let rule = rule.expect("recurring record");

    let instances = RecurrenceExpander::default()
        .expand(&base, &rule, month(2024, 3), None)
        .expect("expansion should succeed");

    assert_eq!(start_dates(&instances), [date(2024, 3, 5)]);
    assert_eq!(instances[0].payload.category.as_deref(), Some("billing"));
    assert_eq!(
        instances[0].payload.extra.get("clientId"),
        Some(&serde_json::json!("C-204"))
    );
}

#[test_log::test]
fn rrule_text_expands() {
    let (base, rule) = record("standup").into_model().expect("valid record");
    assert_eq!(base.start, utc(2024, 1, 1, 9, 0));

    let instances = RecurrenceExpander::default()
        .expand(&base, &rule.expect("recurring record"), month(2024, 1), None)
        .expect("expansion should succeed");

    assert_eq!(instances.len(), 6);
    assert_eq!(instances[5].start.date_naive(), date(2024, 1, 12));
}

#[test_log::test]
fn unknown_frequency_is_reported_per_event() {
    let err = record("broken").into_model().expect_err("invalid rule");

    assert_eq!(err.event_id(), Some("broken"));
    assert!(matches!(
        err,
        AdapterError::InvalidRule {
            source: RuleError::UnknownFrequency(_),
            ..
        }
    ));
}
