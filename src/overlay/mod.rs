//! In-process diagnostic overlay.
//!
//! Records live only in memory for the lifetime of the owning
//! [`OverlayController`]. Nothing here does I/O except through a
//! [`DisplaySurface`](crate::host::DisplaySurface) the host passes in.

pub mod buffer;
pub mod context;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod record;
pub mod render;
pub mod time;
pub mod visibility;

pub use buffer::{EventBuffer, Snapshot};
pub use context::{DROPPED_KEY, NO_CONTEXT};
pub use controller::OverlayController;
pub use error::ConfigurationError;
pub use metrics::{LevelCounts, OverlaySummary};
pub use record::{Context, Level, Record};
pub use time::{Clock, ManualClock, MonotonicClock, Timestamp};
pub use visibility::{Visibility, VisibilityTransition};
