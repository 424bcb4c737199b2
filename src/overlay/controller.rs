use serde::Serialize;
use serde_json::Value;
use std::io;
use tracing::debug;
use uuid::Uuid;

use super::buffer::{EventBuffer, Snapshot};
use super::context;
use super::error::ConfigurationError;
use super::metrics::{compute_summary, OverlaySummary};
use super::record::{Context, Level, Record};
use super::render::render_lines;
use super::time::{Clock, MonotonicClock, Timestamp};
use super::visibility::{Visibility, VisibilityRequest, VisibilityState, VisibilityTransition};
use crate::config::OverlayConfig;
use crate::host::DisplaySurface;

/// The overlay instance a host creates at startup and drops at teardown.
///
/// Owns the only [`EventBuffer`]. All calls are synchronous. The type is
/// `Send`, so a host that shares it across threads wraps it in its own lock.
pub struct OverlayController {
    buffer: EventBuffer,
    visibility: VisibilityState,
    clock: Box<dyn Clock>,
    min_level: Level,
    session_id: Uuid,
    next_sequence: u64,
    last_timestamp: Timestamp,
}

#[derive(Serialize)]
struct ExportLine<'a> {
    session: Uuid,
    #[serde(flatten)]
    record: &'a Record,
}

impl OverlayController {
    pub fn new(config: &OverlayConfig) -> Result<Self, ConfigurationError> {
        Self::with_clock(config, MonotonicClock::new())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigurationError> {
        Self::new(&OverlayConfig {
            capacity,
            ..OverlayConfig::default()
        })
    }

    pub fn with_clock<C>(config: &OverlayConfig, clock: C) -> Result<Self, ConfigurationError>
    where
        C: Clock + 'static,
    {
        config.validate()?;
        let controller = Self {
            buffer: EventBuffer::new(config.capacity)?,
            visibility: VisibilityState::new(config.initial_visibility()),
            clock: Box::new(clock),
            min_level: config.min_level,
            session_id: Uuid::new_v4(),
            next_sequence: 1,
            last_timestamp: Timestamp::default(),
        };
        debug!(
            session = %controller.session_id,
            capacity = config.capacity,
            "overlay created"
        );
        Ok(controller)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // --- Capture ---

    /// Records a diagnostic and returns its sequence number.
    pub fn capture<I, K, V>(&mut self, level: Level, message: impl Into<String>, context: I) -> u64
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (ctx, dropped) = context::sanitize(context);
        self.commit(level, message.into(), ctx, dropped)
    }

    /// Like [`capture`](Self::capture) for context that arrives as JSON.
    pub fn capture_json(&mut self, level: Level, message: impl Into<String>, context: Value) -> u64 {
        let (ctx, dropped) = context::sanitize_json(context);
        self.commit(level, message.into(), ctx, dropped)
    }

    pub fn debug(&mut self, message: impl Into<String>) -> u64 {
        self.commit(Level::Debug, message.into(), Context::new(), 0)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.commit(Level::Info, message.into(), Context::new(), 0)
    }

    pub fn warn(&mut self, message: impl Into<String>) -> u64 {
        self.commit(Level::Warn, message.into(), Context::new(), 0)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.commit(Level::Error, message.into(), Context::new(), 0)
    }

    fn commit(&mut self, level: Level, message: String, ctx: Context, dropped: usize) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        // A clock that steps backwards must not reorder timestamps.
        let timestamp = self.clock.now().max(self.last_timestamp);
        self.last_timestamp = timestamp;

        if dropped > 0 {
            debug!(sequence, dropped, "dropped invalid context entries");
        }
        self.buffer
            .push(Record::new(sequence, timestamp, level, message, ctx));
        sequence
    }

    // --- Visibility ---

    pub fn visibility(&self) -> Visibility {
        self.visibility.current()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility() == Visibility::Visible
    }

    pub fn show(&mut self) -> Option<VisibilityTransition> {
        self.request(VisibilityRequest::Show)
    }

    pub fn hide(&mut self) -> Option<VisibilityTransition> {
        self.request(VisibilityRequest::Hide)
    }

    pub fn toggle(&mut self) -> Option<VisibilityTransition> {
        self.request(VisibilityRequest::Toggle)
    }

    fn request(&mut self, request: VisibilityRequest) -> Option<VisibilityTransition> {
        let transition = self.visibility.apply(request);
        if let Some(t) = &transition {
            debug!(from = ?t.from, to = ?t.to, "visibility updated");
        }
        transition
    }

    /// Every real transition so far (bounded), most recent last.
    pub fn transitions(&self) -> Vec<VisibilityTransition> {
        self.visibility.transitions().copied().collect()
    }

    // --- Reading ---

    pub fn snapshot(&self) -> Snapshot {
        self.buffer.snapshot()
    }

    /// All held records as display lines, oldest first.
    pub fn render(&self) -> Vec<String> {
        self.render_at_least(Level::Debug)
    }

    pub fn render_at_least(&self, level: Level) -> Vec<String> {
        render_lines(&self.buffer.snapshot(), level)
    }

    /// Lines filtered by the configured minimum level.
    pub fn render_for_display(&self) -> Vec<String> {
        self.render_at_least(self.min_level)
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn set_min_level(&mut self, level: Level) {
        self.min_level = level;
    }

    pub fn summary(&self) -> OverlaySummary {
        compute_summary(
            &self.buffer.snapshot(),
            self.buffer.capacity(),
            self.buffer.evicted(),
        )
    }

    /// One JSON document per held record, tagged with this session's id.
    pub fn export_json_lines(&self) -> Result<Vec<String>, serde_json::Error> {
        let snapshot = self.buffer.snapshot();
        snapshot
            .iter()
            .map(|record| {
                serde_json::to_string(&ExportLine {
                    session: self.session_id,
                    record,
                })
            })
            .collect()
    }

    /// Draws the display lines when visible. Hidden overlays draw nothing.
    pub fn present<S: DisplaySurface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        if self.is_visible() {
            surface.draw(&self.render_for_display())?;
        }
        Ok(())
    }

    // --- Buffer management ---

    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Rebuilds the buffer with `capacity` slots, keeping the newest records.
    /// On error the current buffer is left as it was.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), ConfigurationError> {
        self.buffer = self.buffer.resized(capacity)?;
        Ok(())
    }
}
