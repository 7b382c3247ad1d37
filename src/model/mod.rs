// File: ./src/model/mod.rs
pub mod catalog;
pub mod classifier;
pub mod display;
pub mod entry;
pub mod grouper;
pub mod parser;
pub mod window;

pub use catalog::{AllowList, BucketSet, LeaveTypeCatalog, LeaveTypeInfo};
pub use entry::{CalendarEntry, ClassifiedEntry};
pub use grouper::{Bucket, GroupMode, GroupedEntries, group_entries};
pub use window::{TimeWindow, Timed, filter_allowed};
