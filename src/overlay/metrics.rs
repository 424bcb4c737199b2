use super::buffer::Snapshot;
use super::context::DROPPED_KEY;
use super::record::Level;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub debug: u64,
    pub info: u64,
    pub warn: u64,
    pub error: u64,
}

impl LevelCounts {
    pub fn get(&self, level: Level) -> u64 {
        match level {
            Level::Debug => self.debug,
            Level::Info => self.info,
            Level::Warn => self.warn,
            Level::Error => self.error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySummary {
    pub held: usize,
    pub capacity: usize,
    pub evicted: u64,
    pub levels: LevelCounts,
    pub first_sequence: Option<u64>,
    pub last_sequence: Option<u64>,
    /// Records that lost at least one context entry on capture.
    pub records_with_dropped_context: u64,
}

impl OverlaySummary {
    pub fn one_line(&self) -> String {
        format!(
            "{}/{} held, {} evicted | debug={} info={} warn={} error={} | {} with dropped context",
            self.held,
            self.capacity,
            self.evicted,
            self.levels.debug,
            self.levels.info,
            self.levels.warn,
            self.levels.error,
            self.records_with_dropped_context,
        )
    }
}

pub fn compute_summary(snapshot: &Snapshot, capacity: usize, evicted: u64) -> OverlaySummary {
    let mut summary = OverlaySummary {
        held: snapshot.len(),
        capacity,
        evicted,
        first_sequence: snapshot.first().map(|r| r.sequence()),
        last_sequence: snapshot.last().map(|r| r.sequence()),
        ..Default::default()
    };

    for record in snapshot {
        match record.level() {
            Level::Debug => summary.levels.debug += 1,
            Level::Info => summary.levels.info += 1,
            Level::Warn => summary.levels.warn += 1,
            Level::Error => summary.levels.error += 1,
        }
        if record.context().contains_key(DROPPED_KEY) {
            summary.records_with_dropped_context += 1;
        }
    }

    summary
}
