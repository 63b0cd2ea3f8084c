//! Error taxonomy for the commitment engine.

use thiserror::Error;

/// Errors raised by note decoding, tree replay and the hash backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid encoded note: {0}")]
    InvalidNote(String),

    #[error("commitments out of order: expected leaf index {expected}, got {found}")]
    OutOfOrderCommitments { expected: u64, found: u64 },

    #[error("commitment mismatch at leaf {leaf_index}: note derives {expected}, tree holds {found}")]
    CommitmentMismatch {
        leaf_index: u64,
        expected: String,
        found: String,
    },

    #[error("leaf index {leaf_index} not available yet: {available} commitment(s) known")]
    LeafIndexOutOfRange { leaf_index: u64, available: u64 },

    #[error("hash backend initialization failed: {0}")]
    HashBackendInit(String),

    #[error("leaf index {leaf_index} exceeds tree capacity {capacity}")]
    TreeCapacityExceeded { leaf_index: u64, capacity: u64 },

    #[error("commitment history diverged at leaf {leaf_index}")]
    CommitmentHistoryDiverged { leaf_index: u64 },

    #[error("invalid field element: {0}")]
    InvalidFieldElement(String),
}

/// What the caller should do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The note (or something derived from user input) is wrong. Re-paste it.
    InvalidNote,
    /// The indexer has not caught up yet. Retry later.
    NotReady,
    /// The commitment list itself is inconsistent.
    DataSource,
    /// The hash backend is unusable.
    Backend,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::InvalidNote => "invalid_note",
            ErrorClass::NotReady => "not_ready",
            ErrorClass::DataSource => "data_source",
            ErrorClass::Backend => "backend",
        }
    }
}

impl EngineError {
    pub fn class(&self) -> ErrorClass {
        match self {
            EngineError::InvalidNote(_)
            | EngineError::CommitmentMismatch { .. }
            | EngineError::InvalidFieldElement(_) => ErrorClass::InvalidNote,
            EngineError::LeafIndexOutOfRange { .. } => ErrorClass::NotReady,
            EngineError::OutOfOrderCommitments { .. }
            | EngineError::TreeCapacityExceeded { .. }
            | EngineError::CommitmentHistoryDiverged { .. } => ErrorClass::DataSource,
            EngineError::HashBackendInit(_) => ErrorClass::Backend,
        }
    }

    /// Only a lagging indexer is worth retrying; everything else needs a different input.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::NotReady
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
