use crate::model::{AuthorIdentity, TouchRecord};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Suppresses duplicate (author, timestamp) touches within one file.
/// Pagination can re-deliver the same commit across page boundaries when
/// concurrent pushes shift the page window; one `Deduper` per file makes the
/// second delivery a no-op.
#[derive(Debug, Default)]
pub struct Deduper {
    seen: HashSet<(AuthorIdentity, DateTime<Utc>)>,
}

impl Deduper {
    pub fn new() -> Self {
        Self { seen: HashSet::new() }
    }

    /// True when the record is new; false when an identical
    /// (author, timestamp) touch was already admitted.
    pub fn insert(&mut self, record: &TouchRecord) -> bool {
        self.seen.insert((record.author.clone(), record.timestamp))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
