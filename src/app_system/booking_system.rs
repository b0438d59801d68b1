use tracing::{error, info};
use crate::actor_framework::ResourceActor;
use crate::actors::NotificationService;
use crate::booking::{notify_status_change, AvailabilityResolver, ReservationSubmitter, WizardController};
use crate::clients::{MenuClient, NotificationClient, ReservationClient, TableClient};
use crate::domain::{DiningTable, FixedMenuOffering, Reservation, ReservationId};
use crate::reservation_actor::ReservationError;
use super::BookingConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

fn id_sequence(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// Starts every collaborator, wires the clients together and hands out
/// wizards.
pub struct BookingSystem {
    pub table_client: TableClient,
    pub reservation_client: ReservationClient,
    pub menu_client: MenuClient,
    pub notification_client: NotificationClient,
    config: BookingConfig,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl BookingSystem {
    pub fn new(config: BookingConfig) -> Self {
        let (notification_service, notification_client) = NotificationService::new(config.channel_buffer);
        Self::with_notifications(config, notification_service, notification_client)
    }

    /// Same as [`BookingSystem::new`] with a caller-supplied notification service.
    pub fn with_notifications(
        config: BookingConfig,
        notification_service: NotificationService,
        notification_client: NotificationClient,
    ) -> Self {
        info!(?config, "Starting booking system");

        let (table_actor, table_inner) =
            ResourceActor::<DiningTable>::new(config.channel_buffer, id_sequence("table"));
        let table_handle = tokio::spawn(table_actor.run());

        let (reservation_actor, reservation_inner) =
            ResourceActor::<Reservation>::new(config.channel_buffer, id_sequence("reservation"));
        let reservation_handle = tokio::spawn(reservation_actor.run());

        let (menu_actor, menu_inner) =
            ResourceActor::<FixedMenuOffering>::new(config.channel_buffer, id_sequence("menu"));
        let menu_handle = tokio::spawn(menu_actor.run());

        let notification_handle = tokio::spawn(notification_service.run());

        Self {
            table_client: TableClient::new(table_inner),
            reservation_client: ReservationClient::new(reservation_inner),
            menu_client: MenuClient::new(menu_inner),
            notification_client,
            config,
            handles: vec![table_handle, reservation_handle, menu_handle, notification_handle],
        }
    }

    pub fn resolver(&self) -> AvailabilityResolver {
        AvailabilityResolver::new(
            self.table_client.clone(),
            self.reservation_client.clone(),
            self.config.check_timeout,
        )
    }

    pub fn submitter(&self) -> ReservationSubmitter {
        ReservationSubmitter::new(
            self.reservation_client.clone(),
            self.table_client.clone(),
            self.notification_client.clone(),
            self.config.check_timeout,
        )
    }

    /// A fresh wizard with an empty draft.
    pub fn new_wizard(&self) -> WizardController {
        WizardController::new(self.resolver(), self.submitter(), self.menu_client.clone())
    }

    pub async fn confirm_reservation(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        let reservation = self.reservation_client.confirm_reservation(id).await?;
        notify_status_change(self.notification_client.clone(), self.table_client.clone(), &reservation);
        Ok(reservation)
    }

    pub async fn cancel_reservation(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        let reservation = self.reservation_client.cancel_reservation(id).await?;
        notify_status_change(self.notification_client.clone(), self.table_client.clone(), &reservation);
        Ok(reservation)
    }

    /// Drops every client (closing the resource actors' mailboxes), stops the
    /// notification service and waits for all tasks.
    ///
    /// Wizards and clients cloned out of the system keep their actors alive;
    /// drop them first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down booking system...");

        if let Err(e) = self.notification_client.shutdown().await {
            error!(error = %e, "Notification service already stopped");
        }

        drop(self.table_client);
        drop(self.reservation_client);
        drop(self.menu_client);
        drop(self.notification_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Booking system shutdown complete.");
        Ok(())
    }
}
