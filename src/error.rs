use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum GeoIndexError {
    /// A KD-tree was constructed from an empty point sequence.
    #[error("cannot build a KD-tree from an empty point sequence")]
    EmptyInput,

    /// `max_children` was below the minimum of 2.
    #[error("max_children must be >= 2, got {got}")]
    InvalidMaxChildren {
        /// The rejected value.
        got: usize,
    },

    /// A k-NN call was made with a non-positive `n`.
    #[error("n must be > 0 for a nearest-neighbor query")]
    InvalidK,

    /// Catch-all for error conditions that don't warrant their own variant.
    #[error("{0}")]
    General(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeoIndexError>;
