// File: ./src/people.rs
// People records from the resource planner, name matching and assignment payloads.
use crate::model::catalog::LeaveTypeCatalog;
use crate::model::entry::ClassifiedEntry;
use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonRecord {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single record of the people listing that could not be decoded.
#[derive(Debug)]
pub struct DecodeError {
    pub index: usize,
    pub source: serde_json::Error,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "person #{}: {}", self.index, self.source)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl PersonRecord {
    pub fn decode(index: usize, value: &Value) -> Result<Self, DecodeError> {
        serde_json::from_value(value.clone()).map_err(|source| DecodeError { index, source })
    }

    /// The name as the time-off feed writes it: first name and last initial, "John D.".
    pub fn display_key(&self) -> Option<String> {
        let initial = self.last_name.chars().next()?;
        Some(format!("{} {}.", self.first_name, initial))
    }

    pub fn matches(&self, entry: &ClassifiedEntry) -> bool {
        self.display_key()
            .is_some_and(|key| key == entry.person_name)
    }

    pub fn is_product_or_accounts(&self, roles: &[String]) -> bool {
        self.login == "enabled" && self.roles.iter().any(|r| roles.contains(r))
    }
}

/// Decodes a `{"people": [...]}` listing. Undecodable records are returned separately
/// instead of failing the whole listing.
pub fn decode_people(body: &[u8]) -> Result<(Vec<PersonRecord>, Vec<DecodeError>)> {
    let root: Value = serde_json::from_slice(body).context("People listing is not JSON")?;
    let listing = root
        .get("people")
        .and_then(Value::as_array)
        .context("People listing has no 'people' array")?;

    let mut people = Vec::with_capacity(listing.len());
    let mut errors = Vec::new();
    for (index, value) in listing.iter().enumerate() {
        match PersonRecord::decode(index, value) {
            Ok(person) => people.push(person),
            Err(e) => errors.push(e),
        }
    }
    Ok((people, errors))
}

/// Entries belonging to an enabled person holding one of `roles`. Each entry is kept once.
pub fn filter_product_accounts(
    people: &[PersonRecord],
    entries: &[ClassifiedEntry],
    roles: &[String],
) -> Vec<ClassifiedEntry> {
    entries
        .iter()
        .filter(|entry| {
            people
                .iter()
                .any(|p| p.is_product_or_accounts(roles) && p.matches(entry))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncMatch {
    pub person: PersonRecord,
    pub entry: ClassifiedEntry,
}

/// Pairs every entry whose type is mirrored into the planner with each matching person.
pub fn match_for_sync(
    people: &[PersonRecord],
    entries: &[ClassifiedEntry],
    catalog: &LeaveTypeCatalog,
) -> Vec<SyncMatch> {
    let mut matches = Vec::new();
    for entry in entries {
        if !catalog.syncs_to_planner(&entry.leave_type) {
            continue;
        }
        for person in people.iter().filter(|p| p.matches(entry)) {
            matches.push(SyncMatch {
                person: person.clone(),
                entry: entry.clone(),
            });
        }
    }
    matches
}

/// Pulls a weekend date back to the preceding Friday.
pub fn weekend_adjusted(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sun => date - Duration::days(2),
        Weekday::Sat => date - Duration::days(1),
        _ => date,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub allocation: Option<u32>,
    pub active_on_days_off: bool,
    pub repeated_assignment_set_id: Option<u64>,
    pub project_id: String,
    pub person_id: String,
    pub placeholder_id: Option<u64>,
}

impl Assignment {
    pub fn for_match(m: &SyncMatch, project_id: &str) -> Self {
        Self {
            start_date: m.entry.start().date(),
            end_date: weekend_adjusted(m.entry.end().date()),
            allocation: None,
            active_on_days_off: false,
            repeated_assignment_set_id: None,
            project_id: project_id.to_string(),
            person_id: m.person.id.to_string(),
            placeholder_id: None,
        }
    }

    pub fn to_request_body(&self) -> Result<String> {
        let body = serde_json::json!({ "assignment": self });
        Ok(serde_json::to_string(&body)?)
    }
}
