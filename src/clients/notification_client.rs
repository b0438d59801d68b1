use tokio::sync::mpsc;
use crate::domain::ReservationNotice;
use crate::error::NotificationError;
use crate::messages::NotificationRequest;

/// Client for the notification service.
#[derive(Clone)]
pub struct NotificationClient {
    sender: mpsc::Sender<NotificationRequest>,
}

impl NotificationClient {
    pub fn new(sender: mpsc::Sender<NotificationRequest>) -> Self {
        Self { sender }
    }

    pub async fn shutdown(&self) -> Result<(), NotificationError> {
        self.sender
            .send(NotificationRequest::Shutdown)
            .await
            .map_err(|_| NotificationError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(NotificationClient => fn notify(notice: ReservationNotice) -> () as NotificationRequest::Notify, Error = NotificationError);
client_method!(NotificationClient => fn sent() -> Vec<ReservationNotice> as NotificationRequest::Sent, Error = NotificationError);
