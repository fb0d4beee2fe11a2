use docket_recur::{
    BaseOccurrence, ExpansionError, ExpansionOptions, RecurrenceExpander, RecurrenceRule,
    RuleError, TimeWindow, Weekday, expand,
};
use docket_test::fixtures::{date, event, hearing, indices, month, start_dates, utc};

/// ## Summary
/// Weekly series ended after three occurrences yields exactly three.
#[test_log::test]
fn weekly_after_three() {
    let base = event("a", utc(2024, 1, 1, 9, 0), 60);
    let rule = RecurrenceRule::weekly().count(3);

    let instances = RecurrenceExpander::default()
        .expand(&base, &rule, month(2024, 1), None)
        .expect("expansion should succeed");

    assert_eq!(
        start_dates(&instances),
        [date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]
    );
    assert_eq!(indices(&instances), [0, 1, 2]);
    assert!(!instances[0].is_recurrence);
    assert!(instances[1..].iter().all(|instance| instance.is_recurrence));
}

/// ## Summary
/// Weekday list with an inclusive end date.
#[test_log::test]
fn weekdays_until_end_date() {
    let base = event("b", utc(2024, 1, 1, 9, 0), 60);
    let rule = RecurrenceRule::weekly()
        .with_weekdays([Weekday::Monday, Weekday::Wednesday, Weekday::Friday])
        .until(date(2024, 1, 10));

    let instances = expand(&base, &rule, utc(2024, 1, 1, 0, 0), utc(2024, 2, 1, 0, 0), None)
        .expect("expansion should succeed");

    assert_eq!(
        start_dates(&instances),
        [
            date(2024, 1, 1),
            date(2024, 1, 3),
            date(2024, 1, 5),
            date(2024, 1, 8),
            date(2024, 1, 10),
        ]
    );
}

/// ## Summary
/// Month-end anchor clamps into February and returns to the 31st.
#[test_log::test]
fn month_end_clamping() {
    let base = event("c", utc(2024, 1, 31, 0, 0), 60);
    let rule = RecurrenceRule::monthly().count(3);
    let window = TimeWindow::new(utc(2024, 1, 1, 0, 0), utc(2024, 12, 31, 0, 0));

    let instances = RecurrenceExpander::default()
        .expand(&base, &rule, window, None)
        .expect("expansion should succeed");

    assert_eq!(
        start_dates(&instances),
        [date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
    );
}

#[test_log::test]
fn zero_interval_is_rejected() {
    let base = event("d", utc(2024, 1, 1, 9, 0), 60);
    let rule = RecurrenceRule::daily().with_interval(0);

    let err = RecurrenceExpander::default()
        .expand(&base, &rule, month(2024, 1), None)
        .expect_err("zero interval must fail");

    assert!(matches!(
        err,
        ExpansionError::InvalidRule(RuleError::InvalidInterval(0))
    ));
    assert!(err.partial_instances().is_empty());
}

#[test_log::test]
fn window_before_series_is_empty() {
    let base = event("e", utc(2024, 3, 1, 9, 0), 60);
    let rule = RecurrenceRule::daily();

    let instances = RecurrenceExpander::default()
        .expand(&base, &rule, month(2024, 2), None)
        .expect("expansion should succeed");

    assert!(instances.is_empty());
}

#[test_log::test]
fn excluded_base_still_counts() {
    let base = event("a", utc(2024, 1, 1, 9, 0), 60);
    let rule = RecurrenceRule::weekly().count(3);
    let expander = RecurrenceExpander::new(
        ExpansionOptions::default().with_base_occurrence(BaseOccurrence::Exclude),
    );

    let instances = expander
        .expand(&base, &rule, month(2024, 1), None)
        .expect("expansion should succeed");

    assert_eq!(indices(&instances), [1, 2]);
}

#[test_log::test]
fn later_window_keeps_series_numbering() {
    let base = hearing("status", utc(2024, 1, 10, 14, 0), 30);
    let rule = RecurrenceRule::monthly().with_month_day(10);

    let instances = RecurrenceExpander::default()
        .expand(&base, &rule, month(2024, 6), Some("june"))
        .expect("expansion should succeed");

    assert_eq!(instances.len(), 1);
    let instance = &instances[0];
    assert_eq!(instance.occurrence_index, 5);
    assert_eq!(instance.instance_id.as_str(), "june-status_5");
    assert_eq!(instance.start, utc(2024, 6, 10, 14, 0));
    assert_eq!(instance.end, utc(2024, 6, 10, 14, 30));
    assert_eq!(instance.payload, base.payload);
    assert_eq!(instance.title, base.title);
}

#[test_log::test]
fn repeated_expansion_is_identical() {
    let base = hearing("weekly", utc(2024, 1, 2, 16, 0), 45);
    let rule = RecurrenceRule::weekly()
        .with_interval(2)
        .with_weekdays([Weekday::Tuesday, Weekday::Thursday]);
    let expander = RecurrenceExpander::default();

    let first = expander.expand(&base, &rule, month(2024, 3), None);
    let second = expander.expand(&base, &rule, month(2024, 3), None);

    assert_eq!(first.expect("first run"), second.expect("second run"));
}

#[test_log::test]
fn series_end_of_finite_rules() {
    let expander = RecurrenceExpander::default();
    let base = event("a", utc(2024, 1, 1, 9, 0), 60);

    assert_eq!(
        expander
            .series_end(&base, &RecurrenceRule::weekly().count(3))
            .expect("finite series"),
        Some(utc(2024, 1, 15, 10, 0))
    );
    assert_eq!(
        expander
            .series_end(&base, &RecurrenceRule::daily().until(date(2023, 12, 1)))
            .expect("empty series"),
        None
    );
    assert_eq!(
        expander
            .series_end(&base, &RecurrenceRule::daily())
            .expect("endless series"),
        None
    );
}
