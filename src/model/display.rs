// File: ./src/model/display.rs
use crate::model::entry::ClassifiedEntry;
use chrono::{Datelike, Duration, NaiveDateTime};

pub const RANGE_ARROW: &str = "\u{2194}\u{fe0e}";

pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// "Monday, January 2nd"
pub fn format_date(dt: NaiveDateTime) -> String {
    format!(
        "{}{}",
        dt.format("%A, %B %-d"),
        ordinal_suffix(dt.day())
    )
}

pub trait EntryDisplay {
    fn date_descriptor(&self) -> String;
    fn entry_line(&self) -> String;
}

impl EntryDisplay for ClassifiedEntry {
    /// Single date for entries under 25 hours, otherwise a range. Whole-day ranges end
    /// exclusively in the feed, so the displayed end is pulled back one day.
    fn date_descriptor(&self) -> String {
        let duration = self.end() - self.start();
        if duration.num_hours() < 25 {
            return format_date(self.start());
        }
        let end = if duration.num_seconds() % Duration::hours(24).num_seconds() == 0 {
            self.end() - Duration::hours(24)
        } else {
            self.end()
        };
        format!(
            "{} {} {}",
            format_date(self.start()),
            RANGE_ARROW,
            format_date(end)
        )
    }

    fn entry_line(&self) -> String {
        format!("- {} - {}\n", self.person_name, self.date_descriptor())
    }
}
