//! The error type shared by every participation operation.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ParticipationError>;

#[derive(Error, Debug)]
pub enum ParticipationError {
    /// Client input was missing or malformed. Raised before the store is touched.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// The event already holds as many registrations as its capacity allows.
    #[error("event {event_id} has reached its capacity of {capacity}")]
    CapacityExceeded { event_id: i32, capacity: i32 },

    #[error("student {student_id} is already registered for event {event_id}")]
    DuplicateRegistration { student_id: i32, event_id: i32 },

    #[error("email {0} is already registered")]
    DuplicateEmail(String),

    /// Any other storage failure. The underlying error is only reachable through
    /// [`std::error::Error::source`] so that it never ends up in user-facing output.
    #[error("storage failure")]
    Storage(#[source] DieselError),

    #[error("failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to connect to the database: {0}")]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("failed to run database migrations: {0}")]
    Migration(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<DieselError> for ParticipationError {
    fn from(err: DieselError) -> Self {
        Self::Storage(err)
    }
}

impl ParticipationError {
    /// Shorthand for building a [`ParticipationError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns `true` for errors caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NotFound { .. }
                | Self::CapacityExceeded { .. }
                | Self::DuplicateRegistration { .. }
                | Self::DuplicateEmail(_)
        )
    }
}

/// Returns `true` if the storage error is a violation of a `UNIQUE` constraint.
pub(crate) fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}
