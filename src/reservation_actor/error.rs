use thiserror::Error;

/// Errors that can occur during reservation operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    NotFound(String),
    #[error("Reservation rejected: {0}")]
    Rejected(String),
    #[error("Reservation conflicts with another: {0}")]
    Conflict(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
