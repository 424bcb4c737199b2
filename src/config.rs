use serde::Deserialize;
use std::env;

use crate::overlay::{ConfigurationError, Level, Visibility};

pub const DEFAULT_CAPACITY: usize = 200;

pub const ENV_CAPACITY: &str = "DEBUG_OVERLAY_CAPACITY";
pub const ENV_VISIBLE: &str = "DEBUG_OVERLAY_VISIBLE";
pub const ENV_MIN_LEVEL: &str = "DEBUG_OVERLAY_MIN_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub capacity: usize,
    /// Start in `Visible` instead of `Hidden`.
    pub start_visible: bool,
    /// Lowest level drawn by `present`. Capture is never filtered.
    pub min_level: Level,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            start_visible: false,
            min_level: Level::Debug,
        }
    }
}

impl OverlayConfig {
    pub fn initial_visibility(&self) -> Visibility {
        if self.start_visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.capacity < 1 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        Ok(())
    }

    /// Defaults overridden by any `DEBUG_OVERLAY_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CAPACITY) {
            config.capacity = raw
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_CAPACITY, &raw))?;
        }
        if let Some(raw) = lookup(ENV_VISIBLE) {
            config.start_visible = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid(ENV_VISIBLE, &raw)),
            };
        }
        if let Some(raw) = lookup(ENV_MIN_LEVEL) {
            config.min_level =
                Level::from_label(raw.trim()).ok_or_else(|| invalid(ENV_MIN_LEVEL, &raw))?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str) -> ConfigurationError {
    ConfigurationError::InvalidEnv {
        var,
        value: value.to_string(),
    }
}
