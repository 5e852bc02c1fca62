//! Error families for the ranking engine.
//!
//! Validation errors reject a single malformed key or value. Range errors
//! are recoverable: the engine catches them and takes a fallback path.
//! Stage mismatches leave state untouched. Storage errors propagate.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::Stage;
use crate::tier::Tier;

/// A key or attribute record that does not describe a rankable entry.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Key \"{0}\" has no \",\" between number and title")]
    MissingDelimiter(String),

    #[error("Number \"{0}\" must be integer")]
    BadNumber(String),

    #[error("Title must be defined")]
    MissingTitle,

    #[error("Tier \"{0}\" must be in s, a, b, c, d, f")]
    UnknownTier(String),

    #[error("Topic \"{0}\" must be in the topic list")]
    UnknownTopic(String),

    #[error("Value is not a valid attribute record: {0}")]
    BadRecord(#[source] serde_json::Error),
}

/// A tier step or search that has nowhere to go.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Cannot compare same tier")]
    SameTier,

    #[error("Cannot compare beyond best tier")]
    BeyondBest,

    #[error("Cannot compare beyond worst tier")]
    BeyondWorst,

    #[error("Cannot compare to empty tier {0}")]
    EmptyTier(Tier),
}

/// Failure of the key-value medium underneath the item store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to {operation} store file {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file {path} is not a JSON object of strings")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum RankError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Refusing to {action} at stage {stage}!")]
    StageMismatch { action: &'static str, stage: Stage },

    #[error("Snapshot is not a JSON object of tier lists: {0}")]
    Snapshot(#[source] serde_json::Error),
}

impl RankError {
    /// True for errors the interactive loop reports and then carries on from.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Range(_) | Self::StageMismatch { .. } | Self::Validation(_)
        )
    }
}
