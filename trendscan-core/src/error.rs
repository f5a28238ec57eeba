//! Error types for configuration loading and validation.
//!
//! Analysis itself never fails: short history is an `AnalysisOutcome`
//! variant and degenerate numbers short-circuit to "no signal".

use std::path::PathBuf;

use crate::signals::SignalKind;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("weight for {kind} is {score}, which contradicts its bias")]
    Polarity { kind: SignalKind, score: f64 },

    #[error("weight for {kind} is not finite")]
    NonFiniteWeight { kind: SignalKind },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
