use crate::factory::ValidationError;
use thiserror::Error;

pub type Result<T, E = WorkoutError> = std::result::Result<T, E>;

/// Everything that can go wrong inside a session. None of these end the
/// session: each is either recovered where it happens or disables the map.
#[derive(Debug, Error)]
pub enum WorkoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no workout with id {id}")]
    NotFound { id: String },

    #[error("stored workouts are unreadable: {reason}")]
    CorruptPersistedData { reason: String },

    #[error("location access was not granted")]
    PermissionDenied,

    #[error("no map location selected; click the map first")]
    NoPendingLocation,

    #[error("storage: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serializing workouts: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
