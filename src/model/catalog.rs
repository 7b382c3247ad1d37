// File: ./src/model/catalog.rs
// The leave type catalog: emoji, set membership and aliases for every known type.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const VACATION: &str = "Vacation";
pub const SICK_LEAVE: &str = "Sick Leave";
pub const CASUAL_LEAVE: &str = "Casual Leave - Noida Team Only";
pub const WORKING_REMOTELY: &str = "Working Remotely";
pub const WORKING_FROM_HOME: &str = "Working from Home (Same Timezone";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeInfo {
    pub name: String,
    pub emoji: String,
    #[serde(default)]
    pub vacation_like: bool,
    #[serde(default = "default_true")]
    pub product_accounts: bool,
    #[serde(default)]
    pub sync_to_planner: bool,
}

impl LeaveTypeInfo {
    fn new(
        name: &str,
        emoji: &str,
        vacation_like: bool,
        product_accounts: bool,
        sync_to_planner: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            emoji: emoji.to_string(),
            vacation_like,
            product_accounts,
            sync_to_planner,
        }
    }
}

/// Which catalog types get a pre-seeded (possibly empty) bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketSet {
    Full,
    VacationLike,
    ProductAccounts,
}

/// Which leave types survive the allow-list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowList {
    VacationOnly,
    VacationAndRemote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeCatalog {
    pub types: Vec<LeaveTypeInfo>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for LeaveTypeCatalog {
    fn default() -> Self {
        let mut aliases = HashMap::new();
        aliases.insert(WORKING_FROM_HOME.to_string(), WORKING_REMOTELY.to_string());
        Self {
            types: vec![
                LeaveTypeInfo::new(VACATION, ":beach_with_umbrella:", true, true, true),
                LeaveTypeInfo::new(SICK_LEAVE, ":face_with_thermometer:", true, true, false),
                LeaveTypeInfo::new(CASUAL_LEAVE, ":palm_tree:", true, false, true),
                LeaveTypeInfo::new(WORKING_REMOTELY, ":house_with_garden:", false, true, false),
            ],
            aliases,
        }
    }
}

impl LeaveTypeCatalog {
    /// Folds aliases into their canonical name; unknown names pass through unchanged.
    pub fn canonical<'a>(&'a self, leave_type: &'a str) -> &'a str {
        self.aliases
            .get(leave_type)
            .map(String::as_str)
            .unwrap_or(leave_type)
    }

    /// Looks up a type by its exact (already canonical) name.
    pub fn get(&self, leave_type: &str) -> Option<&LeaveTypeInfo> {
        self.types.iter().find(|t| t.name == leave_type)
    }

    /// Resolves aliases before looking the type up.
    pub fn resolve(&self, leave_type: &str) -> Option<&LeaveTypeInfo> {
        self.get(self.canonical(leave_type))
    }

    /// Emoji for a bucket key. Aliases are not folded here: buckets are already canonical.
    pub fn emoji(&self, leave_type: &str) -> Option<&str> {
        self.get(leave_type).map(|t| t.emoji.as_str())
    }

    /// Emoji for an individual entry, folding aliases first.
    pub fn entry_emoji(&self, leave_type: &str) -> Option<&str> {
        self.resolve(leave_type).map(|t| t.emoji.as_str())
    }

    /// Type names of a bucket set, in catalog order.
    pub fn bucket_names(&self, set: BucketSet) -> Vec<&str> {
        self.types
            .iter()
            .filter(|t| match set {
                BucketSet::Full => true,
                BucketSet::VacationLike => t.vacation_like,
                BucketSet::ProductAccounts => t.product_accounts,
            })
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn allows(&self, list: AllowList, leave_type: &str) -> bool {
        if leave_type.is_empty() {
            return false;
        }
        match list {
            AllowList::VacationOnly => self.get(leave_type).is_some_and(|t| t.vacation_like),
            AllowList::VacationAndRemote => self.resolve(leave_type).is_some(),
        }
    }

    pub fn syncs_to_planner(&self, leave_type: &str) -> bool {
        self.resolve(leave_type).is_some_and(|t| t.sync_to_planner)
    }
}
