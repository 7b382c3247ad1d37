// Tests for date descriptors and entry lines.
use chrono::{Duration, NaiveDate, NaiveDateTime};
use leavebot::model::classifier::classify;
use leavebot::model::display::{EntryDisplay, RANGE_ARROW, format_date, ordinal_suffix};
use leavebot::model::entry::CalendarEntry;

fn at(m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn test_ordinal_suffixes() {
    let expected = [
        (1, "st"),
        (2, "nd"),
        (3, "rd"),
        (4, "th"),
        (11, "th"),
        (12, "th"),
        (13, "th"),
        (21, "st"),
        (22, "nd"),
        (23, "rd"),
        (30, "th"),
        (31, "st"),
    ];
    for (day, suffix) in expected {
        assert_eq!(ordinal_suffix(day), suffix, "day {}", day);
    }
}

#[test]
fn test_format_date() {
    assert_eq!(format_date(at(1, 1)), "Monday, January 1st");
    assert_eq!(format_date(at(1, 2)), "Tuesday, January 2nd");
    assert_eq!(format_date(at(3, 23)), "Saturday, March 23rd");
    assert_eq!(format_date(at(12, 11)), "Wednesday, December 11th");
}

#[test]
fn test_full_day_is_single_date() {
    let e = classify(CalendarEntry::new("John Doe (Vacation)", at(1, 1), at(1, 2)));
    assert_eq!(e.date_descriptor(), "Monday, January 1st");
}

#[test]
fn test_just_under_25_hours_is_single_date() {
    let start = at(1, 1);
    let end = start + Duration::hours(24) + Duration::minutes(59);
    let e = classify(CalendarEntry::new("John Doe (Vacation)", start, end));
    assert_eq!(e.date_descriptor(), "Monday, January 1st");
}

#[test]
fn test_two_days_pull_back_exclusive_end() {
    let e = classify(CalendarEntry::new("John Doe (Vacation)", at(1, 1), at(1, 3)));
    assert_eq!(
        e.date_descriptor(),
        format!("Monday, January 1st {} Tuesday, January 2nd", RANGE_ARROW)
    );
}

#[test]
fn test_partial_day_range_keeps_end() {
    let start = at(1, 1);
    let end = at(1, 3) + Duration::hours(12);
    let e = classify(CalendarEntry::new("John Doe (Vacation)", start, end));
    assert_eq!(
        e.date_descriptor(),
        format!("Monday, January 1st {} Wednesday, January 3rd", RANGE_ARROW)
    );
}

#[test]
fn test_range_arrow_is_text_presentation() {
    assert_eq!(RANGE_ARROW, "↔\u{fe0e}");
}

#[test]
fn test_entry_line() {
    let e = classify(CalendarEntry::new("John Doe PTO (Vacation)", at(1, 1), at(1, 3)));
    assert_eq!(
        e.entry_line(),
        "- John Doe - Monday, January 1st ↔\u{fe0e} Tuesday, January 2nd\n"
    );
}
