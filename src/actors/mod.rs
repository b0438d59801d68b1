//! Hand-written services that do not fit the generic resource actor.

use std::collections::VecDeque;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use crate::clients::NotificationClient;
use crate::domain::ReservationNotice;
use crate::error::NotificationError;
use crate::messages::{NotificationRequest, ServiceResponse};

// =============================================================================
// NOTIFICATION SERVICE
// =============================================================================

/// Most recent deliveries kept in the outbox.
pub const OUTBOX_CAPACITY: usize = 256;

/// Delivers reservation notices to guests.
///
/// Delivery here means rendering the notice into the JSON payload a mail
/// template consumes and appending it to the outbox. The outbox keeps only
/// the newest [`OUTBOX_CAPACITY`] entries.
pub struct NotificationService {
    receiver: mpsc::Receiver<NotificationRequest>,
    outbox: VecDeque<(ReservationNotice, String)>,
    outbox_capacity: usize,
    fail_deliveries: bool,
}

impl NotificationService {
    pub fn new(buffer_size: usize) -> (Self, NotificationClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            outbox: VecDeque::new(),
            outbox_capacity: OUTBOX_CAPACITY,
            fail_deliveries: false,
        };
        let client = NotificationClient::new(sender);
        (service, client)
    }

    /// A service whose transport rejects every notice.
    pub fn failing(buffer_size: usize) -> (Self, NotificationClient) {
        let (mut service, client) = Self::new(buffer_size);
        service.fail_deliveries = true;
        (service, client)
    }

    #[instrument(name = "notification_service", skip(self))]
    pub async fn run(mut self) {
        info!("NotificationService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                NotificationRequest::Notify { notice, respond_to } => {
                    self.handle_notify(notice, respond_to);
                }
                NotificationRequest::Sent { respond_to } => {
                    let sent = self.outbox.iter().map(|(notice, _)| notice.clone()).collect();
                    let _ = respond_to.send(Ok(sent));
                }
                NotificationRequest::Shutdown => {
                    info!("NotificationService shutting down");
                    break;
                }
            }
        }
        info!("NotificationService stopped");
    }

    #[instrument(
        fields(reservation_id = %notice.reservation_id, status = %notice.status),
        skip(self, notice, respond_to)
    )]
    fn handle_notify(
        &mut self,
        notice: ReservationNotice,
        respond_to: ServiceResponse<(), NotificationError>,
    ) {
        debug!("Processing notify request");

        let result = match serde_json::to_string(&notice) {
            Err(e) => Err(NotificationError::Render(e.to_string())),
            Ok(_) if self.fail_deliveries => {
                Err(NotificationError::DeliveryFailed("transport unavailable".to_string()))
            }
            Ok(payload) => {
                debug!(payload = %payload, "Notice rendered");
                if self.outbox.len() == self.outbox_capacity {
                    self.outbox.pop_front();
                }
                self.outbox.push_back((notice, payload));
                info!("Notice delivered");
                Ok(())
            }
        };

        if let Err(e) = &result {
            warn!(error = %e, "Notice not delivered");
        }
        let _ = respond_to.send(result);
    }
}
