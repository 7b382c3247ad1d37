// File: ./src/model/window.rs
// Time windows used to select entries, and the leave type allow-list filter.
use crate::model::catalog::{AllowList, LeaveTypeCatalog};
use crate::model::entry::{CalendarEntry, ClassifiedEntry};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

pub trait Timed {
    fn start(&self) -> NaiveDateTime;
    fn end(&self) -> NaiveDateTime;
}

impl Timed for CalendarEntry {
    fn start(&self) -> NaiveDateTime {
        self.start
    }
    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

impl Timed for ClassifiedEntry {
    fn start(&self) -> NaiveDateTime {
        self.entry.start
    }
    fn end(&self) -> NaiveDateTime {
        self.entry.end
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Start strictly inside `(from, to)`.
    Range {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    /// Start strictly after `from`, no upper bound.
    StartingAfter(NaiveDateTime),
    /// Any overlap with the day beginning at `day_start`.
    Day { day_start: NaiveDateTime },
    /// Start within `[start - 1 minute, end)`.
    Upcoming {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl TimeWindow {
    pub fn range(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        TimeWindow::Range { from, to }
    }

    pub fn starting_after(from: NaiveDateTime) -> Self {
        TimeWindow::StartingAfter(from)
    }

    pub fn today(today: NaiveDate) -> Self {
        TimeWindow::Day {
            day_start: midnight(today),
        }
    }

    /// From tomorrow until the end of the calendar week following tomorrow.
    pub fn upcoming_week(today: NaiveDate) -> Self {
        let tomorrow = today + Duration::days(1);
        let weekday = tomorrow.weekday().num_days_from_sunday() as i64;
        let start = midnight(tomorrow);
        let end = start + Duration::days(7 + (6 - weekday));
        TimeWindow::Upcoming { start, end }
    }

    /// The week covered by the weekly digest: this week on a Monday, the next week otherwise.
    pub fn weekly_range(today: NaiveDate) -> Self {
        let days_to_monday = match today.weekday() {
            Weekday::Mon => 0,
            other => 7 - other.num_days_from_monday() as i64,
        };
        let monday = midnight(today + Duration::days(days_to_monday));
        TimeWindow::Range {
            from: monday - Duration::minutes(1),
            to: monday + Duration::days(6),
        }
    }

    /// Everything starting after today's midnight; used for the planner sync.
    pub fn assignment_window(today: NaiveDate) -> Self {
        TimeWindow::StartingAfter(midnight(today))
    }

    pub fn contains<T: Timed>(&self, entry: &T) -> bool {
        let (start, end) = (entry.start(), entry.end());
        match *self {
            TimeWindow::Range { from, to } => start > from && start < to,
            TimeWindow::StartingAfter(from) => start > from,
            TimeWindow::Day { day_start } => {
                let before = day_start - Duration::minutes(1);
                let day_end = day_start + Duration::hours(24);
                (start > before && start < day_end)
                    || (start < before && end > day_end)
                    || (end > day_start && end < day_end)
            }
            TimeWindow::Upcoming { start: from, end: to } => {
                start >= from - Duration::minutes(1) && start < to
            }
        }
    }

    pub fn filter<T: Timed>(&self, entries: impl IntoIterator<Item = T>) -> Vec<T> {
        entries.into_iter().filter(|e| self.contains(e)).collect()
    }
}

/// Drops entries whose leave type is not on the allow-list. Unclassified entries never pass.
pub fn filter_allowed(
    entries: impl IntoIterator<Item = ClassifiedEntry>,
    catalog: &LeaveTypeCatalog,
    list: AllowList,
) -> Vec<ClassifiedEntry> {
    entries
        .into_iter()
        .filter(|e| catalog.allows(list, &e.leave_type))
        .collect()
}
