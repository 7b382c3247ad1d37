// Tests for time windows and the leave type allow-lists.
use chrono::{Duration, NaiveDate, NaiveDateTime};
use leavebot::model::catalog::{AllowList, LeaveTypeCatalog};
use leavebot::model::classifier::classify;
use leavebot::model::entry::{CalendarEntry, ClassifiedEntry};
use leavebot::model::window::{TimeWindow, filter_allowed};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(0, 0, 0).unwrap()
}

fn span(summary: &str, start: NaiveDateTime, end: NaiveDateTime) -> ClassifiedEntry {
    classify(CalendarEntry::new(summary, start, end))
}

#[test]
fn test_weekly_range_on_monday_is_this_week() {
    // 2024-01-01 is a Monday.
    assert_eq!(
        TimeWindow::weekly_range(day(2024, 1, 1)),
        TimeWindow::Range {
            from: at(2024, 1, 1) - Duration::minutes(1),
            to: at(2024, 1, 7),
        }
    );
}

#[test]
fn test_weekly_range_midweek_and_sunday_use_next_monday() {
    let next = TimeWindow::Range {
        from: at(2024, 1, 8) - Duration::minutes(1),
        to: at(2024, 1, 14),
    };
    assert_eq!(TimeWindow::weekly_range(day(2024, 1, 3)), next);
    assert_eq!(TimeWindow::weekly_range(day(2024, 1, 6)), next);
    assert_eq!(TimeWindow::weekly_range(day(2024, 1, 7)), next);
}

#[test]
fn test_weekly_range_includes_monday_midnight_start() {
    let window = TimeWindow::weekly_range(day(2024, 1, 1));
    assert!(window.contains(&span("A B. (Vacation)", at(2024, 1, 1), at(2024, 1, 2))));
    assert!(window.contains(&span("A B. (Vacation)", at(2024, 1, 6), at(2024, 1, 7))));
    // `to` is exclusive.
    assert!(!window.contains(&span("A B. (Vacation)", at(2024, 1, 7), at(2024, 1, 8))));
    assert!(!window.contains(&span("A B. (Vacation)", at(2023, 12, 29), at(2024, 1, 2))));
}

#[test]
fn test_range_bounds_are_strict() {
    let window = TimeWindow::range(at(2024, 1, 1), at(2024, 1, 5));
    assert!(!window.contains(&span("x (Vacation)", at(2024, 1, 1), at(2024, 1, 2))));
    assert!(window.contains(&span("x (Vacation)", at(2024, 1, 2), at(2024, 1, 3))));
    assert!(!window.contains(&span("x (Vacation)", at(2024, 1, 5), at(2024, 1, 6))));
}

#[test]
fn test_starting_after_has_no_upper_bound() {
    let window = TimeWindow::starting_after(at(2024, 1, 1));
    assert!(!window.contains(&span("x (Vacation)", at(2024, 1, 1), at(2024, 1, 2))));
    assert!(window.contains(&span("x (Vacation)", at(2030, 1, 1), at(2030, 1, 2))));
}

#[test]
fn test_assignment_window_starts_after_midnight() {
    assert_eq!(
        TimeWindow::assignment_window(day(2024, 1, 3)),
        TimeWindow::StartingAfter(at(2024, 1, 3))
    );
}

#[test]
fn test_today_overlap_rules() {
    let today = TimeWindow::today(day(2024, 1, 3));

    // Starts today.
    assert!(today.contains(&span("x (Vacation)", at(2024, 1, 3), at(2024, 1, 4))));
    // Spans the whole day.
    assert!(today.contains(&span("x (Vacation)", at(2024, 1, 1), at(2024, 1, 5))));
    // Ends partway through today.
    let half = at(2024, 1, 3) + Duration::hours(12);
    assert!(today.contains(&span("x (Vacation)", at(2024, 1, 2), half)));
    // Ended exactly at today's midnight.
    assert!(!today.contains(&span("x (Vacation)", at(2024, 1, 2), at(2024, 1, 3))));
    // Starts tomorrow.
    assert!(!today.contains(&span("x (Vacation)", at(2024, 1, 4), at(2024, 1, 5))));
}

#[test]
fn test_upcoming_week_runs_to_end_of_following_week() {
    // Today Wednesday 2024-01-03: tomorrow is Thursday (4 days from Sunday),
    // so the window is 7 + 2 days long.
    assert_eq!(
        TimeWindow::upcoming_week(day(2024, 1, 3)),
        TimeWindow::Upcoming {
            start: at(2024, 1, 4),
            end: at(2024, 1, 13),
        }
    );
    // Saturday: tomorrow is Sunday, window covers two full weeks.
    assert_eq!(
        TimeWindow::upcoming_week(day(2024, 1, 6)),
        TimeWindow::Upcoming {
            start: at(2024, 1, 7),
            end: at(2024, 1, 20),
        }
    );
}

#[test]
fn test_upcoming_week_membership() {
    let window = TimeWindow::upcoming_week(day(2024, 1, 3));
    assert!(window.contains(&span("x (Vacation)", at(2024, 1, 4), at(2024, 1, 5))));
    assert!(window.contains(&span("x (Vacation)", at(2024, 1, 12), at(2024, 1, 13))));
    assert!(!window.contains(&span("x (Vacation)", at(2024, 1, 13), at(2024, 1, 14))));
    // Today is not upcoming.
    assert!(!window.contains(&span("x (Vacation)", at(2024, 1, 3), at(2024, 1, 4))));
}

#[test]
fn test_upcoming_week_lower_bound_is_inclusive() {
    let window = TimeWindow::upcoming_week(day(2024, 1, 3));
    let edge = at(2024, 1, 4) - Duration::minutes(1);
    assert!(window.contains(&span("x (Vacation)", edge, at(2024, 1, 5))));
    let before = edge - Duration::minutes(1);
    assert!(!window.contains(&span("x (Vacation)", before, at(2024, 1, 5))));
}

#[test]
fn test_filter_keeps_input_order() {
    let window = TimeWindow::range(at(2024, 1, 1), at(2024, 1, 10));
    let entries = vec![
        span("B (Vacation)", at(2024, 1, 5), at(2024, 1, 6)),
        span("Out (Vacation)", at(2024, 2, 1), at(2024, 2, 2)),
        span("A (Vacation)", at(2024, 1, 2), at(2024, 1, 3)),
    ];
    let kept: Vec<String> = window
        .filter(entries)
        .into_iter()
        .map(|e| e.person_name)
        .collect();
    assert_eq!(kept, vec!["B", "A"]);
}

#[test]
fn test_allow_lists() {
    let catalog = LeaveTypeCatalog::default();
    let entries = vec![
        span("a (Vacation)", at(2024, 1, 1), at(2024, 1, 2)),
        span("b (Sick Leave)", at(2024, 1, 1), at(2024, 1, 2)),
        span("c (Casual Leave - Noida Team Only)", at(2024, 1, 1), at(2024, 1, 2)),
        span("d (Working Remotely)", at(2024, 1, 1), at(2024, 1, 2)),
        span("e (Working from Home (Same Timezone))", at(2024, 1, 1), at(2024, 1, 2)),
        span("f (Jury Duty)", at(2024, 1, 1), at(2024, 1, 2)),
        span("untagged", at(2024, 1, 1), at(2024, 1, 2)),
    ];

    let names = |list| -> Vec<String> {
        filter_allowed(entries.clone(), &catalog, list)
            .into_iter()
            .map(|e| e.leave_type)
            .collect()
    };

    assert_eq!(
        names(AllowList::VacationOnly),
        vec!["Vacation", "Sick Leave", "Casual Leave - Noida Team Only"]
    );
    assert_eq!(
        names(AllowList::VacationAndRemote),
        vec![
            "Vacation",
            "Sick Leave",
            "Casual Leave - Noida Team Only",
            "Working Remotely",
            "Working from Home (Same Timezone",
        ]
    );
}
