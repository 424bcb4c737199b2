pub mod config;
pub mod host;
pub mod logging;
pub mod overlay;

pub use config::OverlayConfig;
pub use overlay::{ConfigurationError, Level, OverlayController, Record, Snapshot, Visibility};
