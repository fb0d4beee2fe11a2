use docket_recur::{ExpansionError, ExpansionOptions, RecurrenceExpander, RecurrenceRule, TimeWindow};
use docket_test::fixtures::{event, indices, utc};

fn capped(max_iterations: usize) -> RecurrenceExpander {
    RecurrenceExpander::new(ExpansionOptions::default().with_max_iterations(max_iterations))
}

#[test_log::test]
fn distant_window_overflows_without_instances() {
    let base = event("daily", utc(2024, 1, 1, 9, 0), 30);
    let window = TimeWindow::new(utc(2030, 1, 1, 0, 0), utc(2030, 2, 1, 0, 0));

    let err = capped(100)
        .expand(&base, &RecurrenceRule::daily(), window, None)
        .expect_err("ceiling should be hit");

    match err {
        ExpansionError::RecurrenceOverflow { ceiling, partial } => {
            assert_eq!(ceiling, 100);
            assert!(partial.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test_log::test]
fn partial_instances_survive_overflow() {
    let base = event("daily", utc(2024, 1, 1, 9, 0), 30);
    let window = TimeWindow::new(utc(2024, 1, 4, 0, 0), utc(2024, 2, 1, 0, 0));

    let err = capped(6)
        .expand(&base, &RecurrenceRule::daily(), window, None)
        .expect_err("ceiling should be hit");

    assert_eq!(indices(err.partial_instances()), [3, 4, 5]);
    assert!(err.to_string().contains('6'));
}

#[test_log::test]
fn series_ending_at_the_ceiling_is_not_an_overflow() {
    let base = event("daily", utc(2024, 1, 1, 9, 0), 30);
    let window = TimeWindow::new(utc(2024, 1, 1, 0, 0), utc(2025, 1, 1, 0, 0));

    let instances = capped(6)
        .expand(&base, &RecurrenceRule::daily().count(6), window, None)
        .expect("natural stop");

    assert_eq!(instances.len(), 6);
}

#[test_log::test]
fn occurrence_listing_respects_the_ceiling() {
    let base = event("weekly", utc(2024, 1, 1, 9, 0), 30);

    let err = capped(3)
        .occurrences(&base, &RecurrenceRule::weekly(), 10)
        .expect_err("ceiling should be hit");
    assert_eq!(indices(err.partial_instances()), [0, 1, 2]);

    let occurrences = capped(3)
        .occurrences(&base, &RecurrenceRule::weekly(), 3)
        .expect("limit reached first");
    assert_eq!(occurrences.len(), 3);
}
