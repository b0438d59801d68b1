use std::time::Duration;

use tracing::{error, info, instrument, warn, Instrument};

use super::availability::check_table;
use super::draft::ReservationDraft;
use crate::clients::{NotificationClient, ReservationClient, TableClient};
use crate::domain::{
    MenuType, Reservation, ReservationCreate, ReservationId, ReservationNotice, ReservationStatus,
    TableId,
};
use crate::error::BookingError;
use crate::reservation_actor::ReservationError;

/// Turns a completed draft into a persisted reservation.
///
/// Flow:
/// 1. Validate the draft is complete
/// 2. Re-check the proposed table for the exact slot
/// 3. Persist with totals recomputed from the cart
/// 4. Link fixed menus and the table, deleting the record if linking fails
/// 5. Notify the guest in the background
#[derive(Clone)]
pub struct ReservationSubmitter {
    reservations: ReservationClient,
    tables: TableClient,
    notifier: NotificationClient,
    check_timeout: Duration,
}

impl ReservationSubmitter {
    pub fn new(
        reservations: ReservationClient,
        tables: TableClient,
        notifier: NotificationClient,
        check_timeout: Duration,
    ) -> Self {
        Self {
            reservations,
            tables,
            notifier,
            check_timeout,
        }
    }

    #[instrument(skip(self, draft), fields(party_size = ?draft.party_size, table_id = ?draft.table_id))]
    pub async fn submit(&self, draft: &ReservationDraft) -> Result<ReservationId, BookingError> {
        // Step 1: Completeness
        draft.check_complete()?;
        let (date, time, party_size) = draft.slot()?;

        // Step 2: The table may have been taken since it was proposed
        if let Some(table_id) = &draft.table_id {
            let free = match check_table(&self.reservations, table_id.clone(), date, time, self.check_timeout).await {
                Ok(free) => free,
                Err(e) => {
                    warn!(error = %e, "Re-check failed, treating table as taken");
                    false
                }
            };
            if !free {
                info!("Proposed table was taken before submission");
                return Err(BookingError::TableUnavailable(table_id.clone()));
            }
        }

        // Step 3: Persist with fresh totals
        let totals = draft.totals();
        let record = ReservationCreate {
            party_size,
            date,
            time,
            menu_type: draft.cart.menu_type(),
            a_la_carte_items: match draft.cart.menu_type() {
                MenuType::ALaCarte => draft.cart.a_la_carte_items().to_vec(),
                _ => Vec::new(),
            },
            totals,
            contact: draft.contact.clone(),
        };
        let id = self
            .reservations
            .persist_reservation(record)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;
        info!(reservation_id = %id, total = %totals.total, "Reservation persisted");

        // Step 4: Associations
        if let Err(e) = self.link(&id, draft).await {
            match &e {
                BookingError::TableUnavailable(_) => {
                    info!(reservation_id = %id, "Table claimed concurrently, rolling back")
                }
                _ => error!(reservation_id = %id, error = %e, "Linking failed, rolling back"),
            }
            if let Err(rollback) = self.reservations.delete_reservation(id.clone()).await {
                error!(reservation_id = %id, error = %rollback, "Rollback failed");
            }
            return Err(e);
        }

        // Step 5: Fire and forget
        let notice = ReservationNotice {
            reservation_id: id.clone(),
            status: ReservationStatus::Pending,
            customer_email: draft.contact.email.clone(),
            customer_name: draft.contact.name.clone(),
            date,
            time,
            guests: party_size,
            table_info: None,
        };
        notify_in_background(self.notifier.clone(), self.tables.clone(), notice, draft.table_id.clone());

        Ok(id)
    }

    async fn link(&self, id: &ReservationId, draft: &ReservationDraft) -> Result<(), BookingError> {
        if draft.cart.menu_type() == MenuType::FixedMenu && !draft.cart.fixed_menus().is_empty() {
            self.reservations
                .link_fixed_menus(id.clone(), draft.cart.fixed_menus().to_vec())
                .await
                .map_err(|e| BookingError::Persistence(e.to_string()))?;
        }
        if let Some(table_id) = &draft.table_id {
            // The repository refuses a second active holder of the same slot,
            // so a concurrent submission that got there first surfaces here.
            self.reservations
                .link_table(id.clone(), table_id.clone())
                .await
                .map_err(|e| match e {
                    ReservationError::Conflict(_) => BookingError::TableUnavailable(table_id.clone()),
                    other => BookingError::Persistence(other.to_string()),
                })?;
        }
        Ok(())
    }
}

/// Tells the guest about `reservation` without waiting for the outcome.
pub fn notify_status_change(notifier: NotificationClient, tables: TableClient, reservation: &Reservation) {
    let notice = ReservationNotice {
        reservation_id: reservation.id.clone(),
        status: reservation.status,
        customer_email: reservation.contact.email.clone(),
        customer_name: reservation.contact.name.clone(),
        date: reservation.date,
        time: reservation.time,
        guests: reservation.party_size,
        table_info: None,
    };
    notify_in_background(notifier, tables, notice, reservation.table_id.clone());
}

/// Spawns the notification. The table name is looked up best-effort; any
/// failure is logged and goes nowhere else.
fn notify_in_background(
    notifier: NotificationClient,
    tables: TableClient,
    mut notice: ReservationNotice,
    table_id: Option<TableId>,
) {
    let span = tracing::info_span!("reservation_notice", reservation_id = %notice.reservation_id);
    tokio::spawn(
        async move {
            if let Some(table_id) = table_id {
                notice.table_info = match tables.get_table(table_id.clone()).await {
                    Ok(Some(table)) => Some(table.name),
                    _ => Some(table_id),
                };
            }
            if let Err(e) = notifier.notify(notice).await {
                warn!(error = %e, "Notification failed");
            }
        }
        .instrument(span),
    );
}
