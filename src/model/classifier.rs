// File: ./src/model/classifier.rs
// Extracts the leave type and display name from an entry summary.
use crate::model::entry::{CalendarEntry, ClassifiedEntry};
use once_cell::sync::Lazy;
use regex::Regex;

// Non-greedy, so a nested tag like "(Working from Home (Same Timezone))" yields
// "Working from Home (Same Timezone".
static TYPE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((.*?)\)").expect("valid type tag regex"));
static EDGE_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s\p{Zs}]+|[\s\p{Zs}]+$").expect("valid edge space regex"));
static INNER_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\p{Zs}]{2,}").expect("valid inner space regex"));

/// Returns the content of the last `(...)` group in the summary.
pub fn extract_leave_type(summary: &str) -> Option<&str> {
    TYPE_TAG
        .captures_iter(summary)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Strips "PTO" and the `(leave_type)` tag, then normalizes whitespace.
pub fn extract_person_name(summary: &str, leave_type: &str) -> String {
    let tag = format!("({})", leave_type);
    let stripped = summary.replace("PTO", "").replace(&tag, "");
    let trimmed = EDGE_SPACE.replace_all(&stripped, "");
    INNER_SPACE.replace_all(&trimmed, " ").into_owned()
}

pub fn classify(entry: CalendarEntry) -> ClassifiedEntry {
    let Some(leave_type) = extract_leave_type(&entry.summary).map(str::to_string) else {
        log::debug!("No leave type tag in '{}'", entry.summary);
        return ClassifiedEntry::unclassified(entry);
    };
    let person_name = extract_person_name(&entry.summary, &leave_type);
    ClassifiedEntry {
        entry,
        leave_type,
        person_name,
    }
}

pub fn classify_all(entries: impl IntoIterator<Item = CalendarEntry>) -> Vec<ClassifiedEntry> {
    entries.into_iter().map(classify).collect()
}
