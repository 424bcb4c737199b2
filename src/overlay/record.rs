use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::time::Timestamp;

/// Severity of a captured record. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Case-insensitive lookup; accepts `warning` as an alias for `warn`.
    pub fn from_label(label: &str) -> Option<Level> {
        match label.to_ascii_lowercase().as_str() {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width specifiers work in render lines
        f.pad(self.label())
    }
}

pub type Context = BTreeMap<String, String>;

/// One captured diagnostic entry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    sequence: u64,
    timestamp: Timestamp,
    level: Level,
    message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    context: Context,
}

impl Record {
    pub fn new(
        sequence: u64,
        timestamp: Timestamp,
        level: Level,
        message: impl Into<String>,
        context: Context,
    ) -> Self {
        Self {
            sequence,
            timestamp,
            level,
            message: message.into(),
            context,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}
