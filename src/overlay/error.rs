use thiserror::Error;

/// The only failure the overlay core knows about: bad configuration.
/// Everything else it does is total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("overlay capacity must be at least 1")]
    ZeroCapacity,

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}
