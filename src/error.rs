//! Error types for the host-facing edges of the core
//!
//! The simulation itself never fails: degenerate numeric cases are recovered
//! in place. Only tuning input and upgrade selection can be rejected.

use std::path::PathBuf;

use thiserror::Error;

/// Problems loading or validating a [`crate::Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    /// Tuning file could not be read
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tuning JSON is malformed
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside the range the simulation can work with
    #[error("invalid tuning value `{name}` = {value}: {reason}")]
    Invalid {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Rejected upgrade selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpgradeError {
    /// No level-up offer is waiting for a choice
    #[error("no upgrade offer is pending")]
    NoOfferPending,

    /// Option index does not exist in the current offer
    #[error("upgrade option {index} out of range (offer has {available})")]
    InvalidChoice { index: usize, available: usize },
}
