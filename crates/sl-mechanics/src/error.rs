//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// The text does not match `<count?>d<sides><(+|-)modifier?>`.
    #[error("invalid dice notation: {0}")]
    InvalidNotation(String),

    /// The notation parses but describes an unrollable pool.
    #[error("invalid pool: {0}")]
    InvalidPool(String),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
