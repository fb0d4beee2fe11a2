use docket_app::agenda::{NoticeKind, collect_upcoming, collect_window};
use docket_recur::recur::adapter::parse_events;
use docket_recur::{ExpansionOptions, RecurrenceExpander};
use docket_test::fixtures::{month, utc};

const CALENDAR: &str = r#"[
    {"id": "intake", "title": "Client intake",
     "startTime": "2024-02-01T10:00:00Z", "endTime": "2024-02-01T11:00:00Z",
     "recurrenceRule": {"frequency": "weekly", "weekdays": [4], "occurrences": 4}},
    {"id": "filing", "title": "Filing deadline", "allDay": true,
     "startTime": "2024-02-14T00:00:00Z", "endTime": "2024-02-15T00:00:00Z"},
    {"id": "sweep", "title": "Inbox sweep",
     "startTime": "2024-02-01T07:00:00Z", "endTime": "2024-02-01T07:10:00Z",
     "recurrenceRule": {"frequency": "daily"}},
    {"id": "typo", "title": "Bad",
     "startTime": "2024-02-01T07:00:00Z", "endTime": "2024-02-01T07:10:00Z",
     "recurrenceRule": {"frequency": "weekly", "weekdays": [9]}}
]"#;

#[test_log::test]
fn agenda_for_a_month() {
    let events = parse_events(CALENDAR).expect("calendar should parse");
    let expander = RecurrenceExpander::new(ExpansionOptions::default().with_max_iterations(20));

    let report = collect_window(&expander, events, month(2024, 2), None);

    let intake = report
        .instances
        .iter()
        .filter(|instance| instance.base_id == "intake")
        .count();
    assert_eq!(intake, 4);

    let filing: Vec<_> = report
        .instances
        .iter()
        .filter(|instance| instance.base_id == "filing")
        .collect();
    assert_eq!(filing.len(), 1);
    assert!(filing[0].payload.all_day);

    let sweep = report
        .instances
        .iter()
        .filter(|instance| instance.base_id == "sweep")
        .count();
    assert_eq!(sweep, 20);

    let notices: Vec<_> = report
        .notices
        .iter()
        .map(|notice| (notice.event_id.as_str(), notice.kind))
        .collect();
    assert_eq!(
        notices,
        [("sweep", NoticeKind::Overflow), ("typo", NoticeKind::InvalidRule)]
    );

    assert!(
        report
            .instances
            .windows(2)
            .all(|pair| pair[0].start <= pair[1].start)
    );
}

#[test_log::test]
fn upcoming_lists_first_occurrences() {
    let events = parse_events(CALENDAR).expect("calendar should parse");

    let report = collect_upcoming(&RecurrenceExpander::default(), events, 2);

    let intake: Vec<_> = report
        .instances
        .iter()
        .filter(|instance| instance.base_id == "intake")
        .map(|instance| instance.start)
        .collect();
    assert_eq!(intake, [utc(2024, 2, 1, 10, 0), utc(2024, 2, 8, 10, 0)]);
    assert!(report.instances.iter().all(|instance| instance.base_id != "filing"));
}
