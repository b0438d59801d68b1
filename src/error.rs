use thiserror::Error;

use crate::booking::WizardStep;
use crate::domain::TableId;

/// Errors raised by the notification service. Never surfaced to guests.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notice could not be rendered: {0}")]
    Render(String),
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Errors surfaced by the reservation wizard and submitter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("Operation not allowed at step {0:?}")]
    InvalidStep(WizardStep),
    #[error("Table {0} is no longer available")]
    TableUnavailable(TableId),
    #[error("Availability check failed for table {table_id}: {reason}")]
    AvailabilityCheck { table_id: TableId, reason: String },
    #[error("Reservation could not be saved: {0}")]
    Persistence(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl BookingError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        BookingError::Validation { field, reason: reason.into() }
    }

    /// Whether the caller may retry after correcting the draft or waiting.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::TableUnavailable(_) | BookingError::Persistence(_))
    }
}
