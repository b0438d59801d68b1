use tokio::sync::oneshot;
use crate::domain::ReservationNotice;
use crate::error::NotificationError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed message enum for the notification service. Each variant includes
/// parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum NotificationRequest {
    Notify {
        notice: ReservationNotice,
        respond_to: ServiceResponse<(), NotificationError>,
    },
    Sent {
        respond_to: ServiceResponse<Vec<ReservationNotice>, NotificationError>,
    },
    Shutdown,
}
