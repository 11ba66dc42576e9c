use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading or querying a roster.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The roster file could not be read.
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),

    /// The roster JSON is malformed.
    #[error("failed to parse roster: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two roster entries share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(EntityId),

    /// An entry references a location that is not in the roster.
    #[error("{owner} references unknown location {location}")]
    UnknownLocation {
        /// The entry holding the bad reference.
        owner: EntityId,
        /// The location id that could not be resolved.
        location: EntityId,
    },

    /// The requested entity does not exist.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),
}
