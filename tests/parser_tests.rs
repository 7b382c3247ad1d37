// Tests for reading the time-off feed into calendar entries.
use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{Component, Event};
use leavebot::model::parser::{ParseSkip, entry_from_event, parse_calendar, parse_feed_date};

const FEED: &str = include_str!("fixtures/timeoff.ics");

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn test_feed_keeps_source_order_and_skips_bad_events() {
    let entries = parse_calendar(FEED.as_bytes()).unwrap();

    // Events 5 (bad DTSTART) and 6 (no DTEND) are dropped.
    let summaries: Vec<&str> = entries.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(
        summaries,
        vec![
            "John Doe PTO (Vacation)",
            "Priya S.  PTO  (Sick Leave)",
            "Ana B. (Working from Home (Same Timezone))",
            "Company offsite",
        ]
    );
    assert_eq!(entries[0].start, at(2024, 1, 1));
    assert_eq!(entries[0].end, at(2024, 1, 3));
}

#[test]
fn test_feed_date_layout_is_literal_midnight() {
    assert_eq!(parse_feed_date("20240101T000000"), Some(at(2024, 1, 1)));
    assert_eq!(parse_feed_date("20240229T000000"), Some(at(2024, 2, 29)));
    // Anything that is not the exact layout is rejected.
    assert_eq!(parse_feed_date("20240101T120000"), None);
    assert_eq!(parse_feed_date("20240101"), None);
    assert_eq!(parse_feed_date("2024-01-01T00:00:00"), None);
    assert_eq!(parse_feed_date("20230229T000000"), None);
}

#[test]
fn test_event_without_end_reports_missing_property() {
    let event = Event::new()
        .summary("Jo K. PTO (Vacation)")
        .add_property("DTSTART", "20240105T000000")
        .done();
    assert_eq!(
        entry_from_event(&event),
        Err(ParseSkip::MissingProperty("DTEND"))
    );
}

#[test]
fn test_event_with_bad_date_reports_value() {
    let event = Event::new()
        .summary("Jo K. PTO (Vacation)")
        .add_property("DTSTART", "20240105T000000")
        .add_property("DTEND", "tomorrow")
        .done();
    let skip = entry_from_event(&event).unwrap_err();
    assert_eq!(
        skip,
        ParseSkip::BadDate {
            property: "DTEND",
            value: "tomorrow".to_string()
        }
    );
    assert_eq!(skip.to_string(), "unparseable DTEND 'tomorrow'");
}

#[test]
fn test_event_with_all_properties_converts() {
    let event = Event::new()
        .summary("Jo K. PTO (Vacation)")
        .add_property("DTSTART", "20240105T000000")
        .add_property("DTEND", "20240106T000000")
        .done();
    let entry = entry_from_event(&event).unwrap();
    assert_eq!(entry.summary, "Jo K. PTO (Vacation)");
    assert_eq!(entry.duration().num_hours(), 24);
}

#[test]
fn test_calendar_without_events_is_empty() {
    let raw = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Empty//EN\r\nEND:VCALENDAR\r\n";
    assert!(parse_calendar(raw.as_bytes()).unwrap().is_empty());
}
