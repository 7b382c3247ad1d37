// File: ./src/job.rs
//! One scheduled run of the integration.
//!
//! A run restores the last-run stamps, downloads the time-off feed, posts whatever
//! messages are due, saves the stamps back and finally mirrors upcoming vacations
//! into the planner. Everything that leaves the process goes through the traits in
//! [`crate::client`], so tests drive [`Job::run`] with fakes and a fixed clock.
use crate::client::{
    AssignmentWriter, BlobStore, CalendarSource, ChatNotifier, Mailer, PeopleDirectory,
};
use crate::compose::MessageKind;
use crate::config::Config;
use crate::context::SharedContext;
use crate::model::catalog::AllowList;
use crate::model::classifier::classify_all;
use crate::model::entry::ClassifiedEntry;
use crate::model::parser::parse_calendar;
use crate::model::window::{TimeWindow, filter_allowed};
use crate::people::{Assignment, PersonRecord, filter_product_accounts, match_for_sync};
use crate::state::{RunState, StoredState, atomic_write};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

pub const CALENDAR_FAILURE_SUBJECT: &str = "Time-off calendar unavailable";
pub const PEOPLE_FAILURE_SUBJECT: &str = "Planner people listing failed";

/// Everything a run talks to.
pub struct Collaborators {
    pub calendar: Box<dyn CalendarSource>,
    pub weekly_chat: Box<dyn ChatNotifier>,
    pub team_chat: Box<dyn ChatNotifier>,
    pub people: Box<dyn PeopleDirectory>,
    pub assignments: Box<dyn AssignmentWriter>,
    pub blobs: Box<dyn BlobStore>,
    pub mailer: Box<dyn Mailer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The daily message went out less than a day ago.
    AlreadyRan,
    CalendarUnavailable,
    Completed,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::AlreadyRan => write!(f, "Ran already"),
            RunOutcome::CalendarUnavailable => write!(f, "Calendar unavailable"),
            RunOutcome::Completed => write!(f, "Executed successfully"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub weekly_sent: bool,
    pub messages_posted: usize,
    pub assignments_created: usize,
}

impl RunReport {
    fn new(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            weekly_sent: false,
            messages_posted: 0,
            assignments_created: 0,
        }
    }
}

pub struct Job {
    config: Config,
    ctx: SharedContext,
    parts: Collaborators,
}

impl Job {
    pub fn new(config: Config, ctx: SharedContext, parts: Collaborators) -> Self {
        Self { config, ctx, parts }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunReport> {
        let today = now.date_naive();
        let state_path = self.ctx.get_state_path()?;

        let stored = self.restore_state(&state_path, now).await;
        let schedule = stored.decide(now);
        if schedule.skip_daily {
            log::info!("Daily message already sent, nothing to do");
            return Ok(RunReport::new(RunOutcome::AlreadyRan));
        }

        let raw = match self.parts.calendar.fetch().await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Calendar download failed: {:#}", e);
                self.alert(
                    CALENDAR_FAILURE_SUBJECT,
                    &format!("Calendar link expired: {:#}", e),
                )
                .await;
                return Ok(RunReport::new(RunOutcome::CalendarUnavailable));
            }
        };
        let calendar_path = self.ctx.get_calendar_path()?;
        if let Err(e) = atomic_write(&calendar_path, &raw) {
            log::warn!("Could not keep a copy of the calendar: {:#}", e);
        }

        let entries = match parse_calendar(&raw) {
            Ok(parsed) => classify_all(parsed),
            Err(e) => {
                log::warn!("Calendar is unreadable, continuing without entries: {:#}", e);
                self.alert(
                    CALENDAR_FAILURE_SUBJECT,
                    &format!("Calendar link expired or returned an unreadable document: {:#}", e),
                )
                .await;
                Vec::new()
            }
        };
        log::info!("Parsed {} calendar entries", entries.len());
        let people = self.load_people().await;

        let mut report = RunReport::new(RunOutcome::Completed);
        let mut state = stored.state();

        if schedule.weekly_due {
            let weekly = self.render(MessageKind::Weekly, &entries, today, None);
            if self.post(self.parts.weekly_chat.as_ref(), &weekly).await {
                report.messages_posted += 1;
            }
            let upcoming =
                self.render(MessageKind::Upcoming, &entries, today, Some(people.as_slice()));
            if self.post(self.parts.team_chat.as_ref(), &upcoming).await {
                report.messages_posted += 1;
            }
            report.weekly_sent = true;
            state.weekly_run_time = now;
        }

        let daily = self.render(MessageKind::Today, &entries, today, Some(people.as_slice()));
        if self.post(self.parts.team_chat.as_ref(), &daily).await {
            report.messages_posted += 1;
        }
        state.daily_run_time = now;

        self.persist_state(&state, &state_path).await;
        report.assignments_created = self.sync_assignments(&entries, &people, today).await;

        log::info!(
            "{}: {} messages, {} assignments",
            report.outcome,
            report.messages_posted,
            report.assignments_created
        );
        Ok(report)
    }

    /// Any local copy is discarded first, so a failed download means a fresh state.
    async fn restore_state(&self, path: &std::path::Path, now: DateTime<Utc>) -> StoredState {
        if path.exists()
            && let Err(e) = std::fs::remove_file(path)
        {
            log::warn!("Could not clear stale run state: {}", e);
        }
        match self
            .parts
            .blobs
            .download_to(&self.config.storage.state_key, path)
            .await
        {
            Ok(true) => {}
            Ok(false) => log::info!("No stored run state, starting fresh"),
            Err(e) => log::warn!("Run state download failed: {:#}", e),
        }
        RunState::load(path, now)
    }

    async fn persist_state(&self, state: &RunState, path: &std::path::Path) {
        if let Err(e) = state.save(path) {
            log::warn!("{:#}", e);
            return;
        }
        if let Err(e) = self
            .parts
            .blobs
            .upload_from(&self.config.storage.state_key, path)
            .await
        {
            log::warn!("Run state upload failed: {:#}", e);
        }
    }

    async fn load_people(&self) -> Vec<PersonRecord> {
        match self.parts.people.people().await {
            Ok(people) => people,
            Err(e) => {
                log::warn!("People listing failed: {:#}", e);
                self.alert(
                    PEOPLE_FAILURE_SUBJECT,
                    &format!("Could not load people from the planner: {:#}", e),
                )
                .await;
                Vec::new()
            }
        }
    }

    /// Product/accounts kinds are narrowed to eligible people when `people` is given.
    fn render(
        &self,
        kind: MessageKind,
        entries: &[ClassifiedEntry],
        today: NaiveDate,
        people: Option<&[PersonRecord]>,
    ) -> String {
        let catalog = &self.config.catalog;
        let mut selected = kind.select(entries, today, catalog);
        if let Some(people) = people {
            let roles = &self.config.forecast.product_roles;
            selected = filter_product_accounts(people, &selected, roles);
        }
        log::debug!("{} message covers {} entries", kind, selected.len());
        kind.render(&selected, catalog)
    }

    async fn post(&self, notifier: &dyn ChatNotifier, text: &str) -> bool {
        match notifier.notify(text).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Posting message failed: {:#}", e);
                false
            }
        }
    }

    async fn alert(&self, subject: &str, body: &str) {
        let mail = &self.config.mail;
        if let Err(e) = self
            .parts
            .mailer
            .send(&mail.from, &mail.admin, subject, body)
            .await
        {
            log::warn!("Admin email failed: {:#}", e);
        }
    }

    async fn sync_assignments(
        &self,
        entries: &[ClassifiedEntry],
        people: &[PersonRecord],
        today: NaiveDate,
    ) -> usize {
        let catalog = &self.config.catalog;
        let window = TimeWindow::assignment_window(today);
        let upcoming = filter_allowed(
            window.filter(entries.iter().cloned()),
            catalog,
            AllowList::VacationOnly,
        );
        let project_id = &self.config.forecast.time_off_project_id;

        let mut created = 0;
        for m in match_for_sync(people, &upcoming, catalog) {
            let assignment = Assignment::for_match(&m, project_id);
            match self.parts.assignments.create(&assignment).await {
                Ok(()) => {
                    log::info!(
                        "Blocked {} .. {} for person {}",
                        assignment.start_date,
                        assignment.end_date,
                        assignment.person_id
                    );
                    created += 1;
                }
                Err(e) => log::warn!("Assignment for '{}' failed: {:#}", m.entry.summary(), e),
            }
        }
        created
    }
}
