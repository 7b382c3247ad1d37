// File: ./src/model/grouper.rs
// Buckets classified entries by canonical leave type.
use crate::model::catalog::{BucketSet, LeaveTypeCatalog, VACATION};
use crate::model::entry::ClassifiedEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    /// One bucket per type of the set, seeded empty, plus any unknown type encountered.
    Seeded(BucketSet),
    /// Every entry lands in the single "Vacation" bucket; nothing is seeded.
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub leave_type: String,
    pub entries: Vec<ClassifiedEntry>,
}

/// Buckets in insertion order: seeded catalog types first, then types first seen in input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedEntries {
    buckets: Vec<Bucket>,
}

impl GroupedEntries {
    fn bucket_mut(&mut self, leave_type: &str) -> &mut Bucket {
        let idx = match self.buckets.iter().position(|b| b.leave_type == leave_type) {
            Some(idx) => idx,
            None => {
                self.buckets.push(Bucket {
                    leave_type: leave_type.to_string(),
                    entries: Vec::new(),
                });
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[idx]
    }

    pub fn get(&self, leave_type: &str) -> Option<&[ClassifiedEntry]> {
        self.buckets
            .iter()
            .find(|b| b.leave_type == leave_type)
            .map(|b| b.entries.as_slice())
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.leave_type.as_str())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_entries(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }
}

pub fn group_entries(
    entries: &[ClassifiedEntry],
    catalog: &LeaveTypeCatalog,
    mode: GroupMode,
) -> GroupedEntries {
    let mut grouped = GroupedEntries::default();
    if let GroupMode::Seeded(set) = mode {
        for name in catalog.bucket_names(set) {
            grouped.bucket_mut(name);
        }
    }

    for entry in entries.iter().filter(|e| e.is_classified()) {
        let key = match mode {
            GroupMode::Upcoming => VACATION,
            GroupMode::Seeded(_) => catalog.canonical(&entry.leave_type),
        };
        grouped.bucket_mut(key).entries.push(entry.clone());
    }

    for bucket in &mut grouped.buckets {
        bucket.entries.sort_by_key(|e| e.start());
    }
    grouped
}
