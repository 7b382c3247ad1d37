// File: ./src/model/entry.rs
// Calendar entries as read from the feed, and their classified form.
use chrono::{Duration, NaiveDateTime};

/// One VEVENT from the time-off feed. Timestamps are taken literally (no zone conversion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CalendarEntry {
    pub fn new(summary: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            summary: summary.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A calendar entry with its leave type and display name extracted from the summary.
///
/// `leave_type` is empty when the summary carries no `(type)` tag; such entries never
/// reach grouping or rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub entry: CalendarEntry,
    pub leave_type: String,
    pub person_name: String,
}

impl ClassifiedEntry {
    pub fn unclassified(entry: CalendarEntry) -> Self {
        Self {
            entry,
            leave_type: String::new(),
            person_name: String::new(),
        }
    }

    pub fn is_classified(&self) -> bool {
        !self.leave_type.is_empty()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.entry.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.entry.end
    }

    pub fn summary(&self) -> &str {
        &self.entry.summary
    }
}
