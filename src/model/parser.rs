// File: ./src/model/parser.rs
// Reads a raw iCalendar document into calendar entries.
use crate::model::entry::CalendarEntry;
use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{Calendar, CalendarComponent, Component, Event};
use std::fmt;

/// Date layout used by the feed: a date followed by a literal midnight time.
const DATE_LAYOUT: &str = "%Y%m%dT000000";

/// Why a VEVENT was left out of the parsed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSkip {
    MissingProperty(&'static str),
    BadDate { property: &'static str, value: String },
}

impl fmt::Display for ParseSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSkip::MissingProperty(name) => write!(f, "missing {}", name),
            ParseSkip::BadDate { property, value } => {
                write!(f, "unparseable {} '{}'", property, value)
            }
        }
    }
}

impl std::error::Error for ParseSkip {}

pub fn parse_feed_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), DATE_LAYOUT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn required<'a>(event: &'a Event, name: &'static str) -> Result<&'a str, ParseSkip> {
    event
        .properties()
        .get(name)
        .map(|p| p.value())
        .ok_or(ParseSkip::MissingProperty(name))
}

fn date_property(event: &Event, name: &'static str) -> Result<NaiveDateTime, ParseSkip> {
    let raw = required(event, name)?;
    parse_feed_date(raw).ok_or_else(|| ParseSkip::BadDate {
        property: name,
        value: raw.to_string(),
    })
}

/// Converts a single VEVENT. Fails when SUMMARY, DTSTART or DTEND is missing or malformed.
pub fn entry_from_event(event: &Event) -> Result<CalendarEntry, ParseSkip> {
    let summary = required(event, "SUMMARY")?;
    let start = date_property(event, "DTSTART")?;
    let end = date_property(event, "DTEND")?;
    Ok(CalendarEntry::new(summary, start, end))
}

/// Parses a calendar document, keeping source order.
///
/// Events that cannot be converted are logged and skipped; only a document that is not
/// iCalendar at all is an error.
pub fn parse_calendar(raw: &[u8]) -> Result<Vec<CalendarEntry>> {
    let text = String::from_utf8_lossy(raw);
    let calendar: Calendar = text
        .parse()
        .map_err(|e| anyhow!("Failed to parse calendar: {}", e))?;

    let mut entries = Vec::with_capacity(calendar.components.len());
    for component in &calendar.components {
        let CalendarComponent::Event(event) = component else {
            continue;
        };
        match entry_from_event(event) {
            Ok(entry) => entries.push(entry),
            Err(skip) => log::warn!(
                "Skipping calendar event '{}': {}",
                event.get_summary().unwrap_or("<no summary>"),
                skip
            ),
        }
    }
    log::debug!("Parsed {} calendar entries", entries.len());
    Ok(entries)
}
