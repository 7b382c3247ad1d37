// File: ./src/compose.rs
//! Renders grouped entries into chat messages.
//!
//! Three message kinds exist: the weekly digest for the whole company, and the
//! product/accounts report in its "today" and "upcoming" flavours. Each kind fixes its
//! time window, allow-list and grouping, so callers go through [`MessageKind::select`]
//! and [`MessageKind::render`] rather than wiring those pieces by hand.
use crate::model::catalog::{AllowList, BucketSet, LeaveTypeCatalog};
use crate::model::display::EntryDisplay;
use crate::model::entry::ClassifiedEntry;
use crate::model::grouper::{GroupMode, GroupedEntries, group_entries};
use crate::model::window::{TimeWindow, filter_allowed};
use chrono::NaiveDate;
use strum::{Display, EnumIter, EnumString};

pub const WEEKLY_HEADER: &str =
    "Hey there :wave:, keeping you up to date on who's O.O.O. this week";
pub const TODAY_HEADER: &str =
    "Hey there :wave:, keeping you up to date on who's O.O.O. in Product and Accounts team today:";
pub const UPCOMING_HEADER: &str = ":calendar: *Upcoming OOOs* :calendar:";
pub const NOTHING_UPCOMING: &str = "Nothing for the upcoming week yet!!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    Weekly,
    Today,
    Upcoming,
}

impl MessageKind {
    pub fn window(self, today: NaiveDate) -> TimeWindow {
        match self {
            MessageKind::Weekly => TimeWindow::weekly_range(today),
            MessageKind::Today => TimeWindow::today(today),
            MessageKind::Upcoming => TimeWindow::upcoming_week(today),
        }
    }

    pub fn group_mode(self) -> GroupMode {
        match self {
            MessageKind::Weekly => GroupMode::Seeded(BucketSet::Full),
            MessageKind::Today => GroupMode::Seeded(BucketSet::ProductAccounts),
            MessageKind::Upcoming => GroupMode::Upcoming,
        }
    }

    /// Applies this kind's window and the vacation-and-remote allow-list.
    pub fn select(
        self,
        entries: &[ClassifiedEntry],
        today: NaiveDate,
        catalog: &LeaveTypeCatalog,
    ) -> Vec<ClassifiedEntry> {
        let windowed = self.window(today).filter(entries.iter().cloned());
        filter_allowed(windowed, catalog, AllowList::VacationAndRemote)
    }

    pub fn render(self, selected: &[ClassifiedEntry], catalog: &LeaveTypeCatalog) -> String {
        let grouped = group_entries(selected, catalog, self.group_mode());
        let composer = Composer::new(catalog);
        match self {
            MessageKind::Weekly => composer.weekly(&grouped),
            MessageKind::Today => composer.product_accounts(&grouped, false),
            MessageKind::Upcoming => composer.product_accounts(&grouped, true),
        }
    }
}

pub struct Composer<'a> {
    catalog: &'a LeaveTypeCatalog,
}

impl<'a> Composer<'a> {
    pub fn new(catalog: &'a LeaveTypeCatalog) -> Self {
        Self { catalog }
    }

    /// Buckets without an emoji are left out entirely.
    pub fn weekly(&self, grouped: &GroupedEntries) -> String {
        let mut message = WEEKLY_HEADER.to_string();
        for bucket in grouped.buckets() {
            let Some(emoji) = self.catalog.emoji(&bucket.leave_type) else {
                log::debug!("No emoji for '{}', leaving it out", bucket.leave_type);
                continue;
            };
            message.push_str(&format!(
                "\n\n{} *{}* ({} in total):\n\n",
                emoji,
                bucket.leave_type,
                bucket.entries.len()
            ));
            for entry in &bucket.entries {
                message.push_str(&entry.entry_line());
            }
        }
        message
    }

    pub fn product_accounts(&self, grouped: &GroupedEntries, upcoming: bool) -> String {
        if upcoming {
            self.upcoming(grouped)
        } else {
            self.today(grouped)
        }
    }

    fn today(&self, grouped: &GroupedEntries) -> String {
        let mut message = TODAY_HEADER.to_string();
        for bucket in grouped.buckets() {
            if self.catalog.get(&bucket.leave_type).is_none() {
                log::debug!("Unknown leave type '{}', leaving it out", bucket.leave_type);
                continue;
            }
            if bucket.entries.is_empty() {
                message.push_str(&format!("\n\nNo one is on *{}* today!!", bucket.leave_type));
                continue;
            }
            message.push_str(&format!(
                "\n\n*{}* ({} in total):\n\n",
                bucket.leave_type,
                bucket.entries.len()
            ));
            for entry in &bucket.entries {
                message.push_str(&entry.entry_line());
            }
        }
        message
    }

    // A missing emoji drops only the prefix here, unlike the bucket-level skip above.
    fn upcoming(&self, grouped: &GroupedEntries) -> String {
        let mut message = format!("{}\n\n", UPCOMING_HEADER);
        let mut emitted = 0;
        for bucket in grouped.buckets() {
            for entry in &bucket.entries {
                if let Some(emoji) = self.catalog.entry_emoji(&entry.leave_type) {
                    message.push_str(emoji);
                    message.push(' ');
                }
                message.push_str(&entry.entry_line());
                emitted += 1;
            }
        }
        if emitted == 0 {
            message.push_str(NOTHING_UPCOMING);
        }
        message
    }
}
