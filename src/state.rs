// File: ./src/state.rs
// Last-run timestamps that keep the daily and weekly messages from repeating.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DAILY_MIN_HOURS: i64 = 23;
pub const WEEKLY_MIN_HOURS: i64 = 150;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub daily_run_time: DateTime<Utc>,
    pub weekly_run_time: DateTime<Utc>,
}

/// A state read from disk, or a fresh one when nothing usable was there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredState {
    Loaded(RunState),
    Fresh(RunState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub skip_daily: bool,
    pub weekly_due: bool,
}

impl StoredState {
    pub fn state(&self) -> RunState {
        match *self {
            StoredState::Loaded(s) | StoredState::Fresh(s) => s,
        }
    }

    /// Both throttles work on whole elapsed hours.
    pub fn decide(&self, now: DateTime<Utc>) -> Schedule {
        match *self {
            StoredState::Fresh(_) => Schedule {
                skip_daily: false,
                weekly_due: true,
            },
            StoredState::Loaded(s) => {
                let daily_hours = (now - s.daily_run_time).num_hours();
                let weekly_hours = (now - s.weekly_run_time).num_hours();
                log::debug!(
                    "Hours since last run: daily {}, weekly {}",
                    daily_hours,
                    weekly_hours
                );
                Schedule {
                    skip_daily: daily_hours < DAILY_MIN_HOURS,
                    weekly_due: weekly_hours >= WEEKLY_MIN_HOURS,
                }
            }
        }
    }
}

impl RunState {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            daily_run_time: now,
            weekly_run_time: now,
        }
    }

    /// Missing or unparseable files mean "never ran"; both stamps default to `now`.
    pub fn load(path: &Path, now: DateTime<Utc>) -> StoredState {
        let parsed = fs::read_to_string(path)
            .ok()
            .and_then(|json| match serde_json::from_str::<RunState>(&json) {
                Ok(state) => Some(state),
                Err(e) => {
                    log::warn!("Ignoring unreadable run state {}: {}", path.display(), e);
                    None
                }
            });
        match parsed {
            Some(state) => StoredState::Loaded(state),
            None => StoredState::Fresh(Self::starting_at(now)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        atomic_write(path, json)
            .with_context(|| format!("Failed to write run state {}", path.display()))
    }
}

/// Atomic write: Write to .tmp file then rename
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}
