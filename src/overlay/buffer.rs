use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

use super::error::ConfigurationError;
use super::record::Record;

/// Fixed-capacity FIFO of records. Oldest at the front.
#[derive(Debug, Clone)]
pub struct EventBuffer {
    records: VecDeque<Arc<Record>>,
    capacity: usize,
    evicted: u64,
}

impl EventBuffer {
    pub fn new(capacity: usize) -> Result<Self, ConfigurationError> {
        if capacity < 1 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        Ok(Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        })
    }

    /// Appends at the tail, evicting the oldest record when full.
    ///
    /// Records fed in directly must carry strictly increasing sequences.
    /// One whose sequence is not newer than the current tail is treated as
    /// a repeated or stale submission and ignored, so pushing several
    /// records with the same sequence keeps only the first.
    pub fn push(&mut self, record: Record) {
        if let Some(newest) = self.records.back() {
            if record.sequence() <= newest.sequence() {
                trace!(
                    sequence = record.sequence(),
                    newest = newest.sequence(),
                    "ignoring stale record"
                );
                return;
            }
        }
        if self.records.len() >= self.capacity {
            if let Some(old) = self.records.pop_front() {
                self.evicted += 1;
                trace!(sequence = old.sequence(), "evicted oldest record");
            }
        }
        self.records.push_back(Arc::new(record));
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            records: self.records.iter().cloned().collect(),
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records lost to overflow or to shrinking via `resized`. Not reset by `clear`.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// A new buffer with `capacity` slots holding the newest records of this one.
    pub fn resized(&self, capacity: usize) -> Result<EventBuffer, ConfigurationError> {
        let mut next = EventBuffer::new(capacity)?;
        let skip = self.records.len().saturating_sub(capacity);
        next.records.extend(self.records.iter().skip(skip).cloned());
        next.evicted = self.evicted + skip as u64;
        debug!(
            from = self.capacity,
            to = capacity,
            discarded = skip,
            "overlay buffer resized"
        );
        Ok(next)
    }
}

/// Point-in-time view of a buffer. Shares records with the buffer, so
/// taking one is cheap and later pushes or clears do not touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<Arc<Record>>,
}

impl Snapshot {
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first().map(|r| r.as_ref())
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last().map(|r| r.as_ref())
    }

    pub fn messages(&self) -> Vec<&str> {
        self.iter().map(Record::message).collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Record;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, Arc<Record>>, fn(&'a Arc<Record>) -> &'a Record>;

    fn into_iter(self) -> Self::IntoIter {
        fn deref(r: &Arc<Record>) -> &Record {
            r.as_ref()
        }
        self.records.iter().map(deref as fn(&'a Arc<Record>) -> &'a Record)
    }
}
