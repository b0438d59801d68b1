use std::future::Future;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument};

use super::availability::{AvailabilityResolver, Resolution, SlotRequest};
use super::cart::MenuSelectionCart;
use super::draft::{ReservationDraft, WizardStep};
use super::submitter::ReservationSubmitter;
use crate::actor_framework::{ResourceEvent, Subscription};
use crate::clients::{MenuClient, ReservationClient};
use crate::domain::{Contact, FixedMenuOffering, MenuType, Reservation, ReservationId, TableAvailability, TableId, Totals};
use crate::error::BookingError;

struct ReservationFeed {
    _subscription: Subscription<Reservation>,
    events: mpsc::UnboundedReceiver<ResourceEvent<Reservation>>,
}

/// Drives one guest through date/time → menu → table → contact → review →
/// submit. Owns the draft until it is submitted or dropped.
pub struct WizardController {
    draft: ReservationDraft,
    resolver: AvailabilityResolver,
    submitter: ReservationSubmitter,
    menus: MenuClient,
    availability: Option<Resolution>,
    step_tx: watch::Sender<WizardStep>,
    feed: Option<ReservationFeed>,
}

impl WizardController {
    pub fn new(resolver: AvailabilityResolver, submitter: ReservationSubmitter, menus: MenuClient) -> Self {
        let (step_tx, _) = watch::channel(WizardStep::DateTime);
        Self {
            draft: ReservationDraft::default(),
            resolver,
            submitter,
            menus,
            availability: None,
            step_tx,
            feed: None,
        }
    }

    pub fn draft(&self) -> &ReservationDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.draft.step
    }

    /// Follows the current step; the view scrolls to each new value.
    pub fn watch_step(&self) -> watch::Receiver<WizardStep> {
        self.step_tx.subscribe()
    }

    pub fn totals(&self) -> Totals {
        self.draft.totals()
    }

    fn ensure_editable(&self) -> Result<(), BookingError> {
        match self.draft.step {
            WizardStep::Submitted => Err(BookingError::InvalidStep(WizardStep::Submitted)),
            _ => Ok(()),
        }
    }

    fn enter(&mut self, step: WizardStep) {
        self.draft.step = step;
        if step == WizardStep::MenuSelection && !self.draft.cart.is_chosen() {
            self.draft.cart.select_menu_type(MenuType::AtRestaurant, true);
            debug!("Menu type defaulted to AtRestaurant");
        }
        self.step_tx.send_replace(step);
    }

    // --- Step navigation ---

    #[instrument(skip(self), fields(step = ?self.draft.step))]
    pub fn advance(&mut self) -> Result<WizardStep, BookingError> {
        let current = self.draft.step;
        let next = current.next().ok_or(BookingError::InvalidStep(current))?;
        self.draft.check_step(current)?;
        self.enter(next);
        info!(next = ?next, "Advanced");
        Ok(next)
    }

    #[instrument(skip(self), fields(step = ?self.draft.step))]
    pub fn retreat(&mut self) -> Result<WizardStep, BookingError> {
        let current = self.draft.step;
        let previous = current.previous().ok_or(BookingError::InvalidStep(current))?;
        self.enter(previous);
        Ok(previous)
    }

    // --- Date and time ---

    /// Sets the requested slot. A changed slot drops the shown availability
    /// and any proposed table.
    pub fn set_slot(&mut self, date: NaiveDate, time: NaiveTime, party_size: u32) -> Result<(), BookingError> {
        self.ensure_editable()?;
        let changed = self.draft.date != Some(date)
            || self.draft.time != Some(time)
            || self.draft.party_size != Some(party_size);
        self.draft.date = Some(date);
        self.draft.time = Some(time);
        self.draft.party_size = Some(party_size);
        if changed {
            self.availability = None;
            self.draft.table_id = None;
        }
        Ok(())
    }

    // --- Menu ---

    pub async fn fixed_menu_offerings(&self) -> Result<Vec<FixedMenuOffering>, BookingError> {
        self.menus
            .list_fixed_menu_offerings()
            .await
            .map_err(|e| BookingError::ActorCommunicationError(e.to_string()))
    }

    pub fn cart(&self) -> &MenuSelectionCart {
        &self.draft.cart
    }

    pub fn cart_mut(&mut self) -> Result<&mut MenuSelectionCart, BookingError> {
        self.ensure_editable()?;
        Ok(&mut self.draft.cart)
    }

    // --- Tables ---

    /// Starts resolving availability for the draft's slot. The returned
    /// future may be awaited anywhere; hand its result to
    /// [`WizardController::apply_availability`].
    pub fn request_availability(
        &self,
    ) -> Result<impl Future<Output = Result<Resolution, BookingError>> + Send + 'static, BookingError> {
        self.ensure_editable()?;
        let (date, time, party_size) = self.draft.slot()?;
        Ok(self.resolver.resolve(SlotRequest { date, time, party_size }))
    }

    /// Shows `resolution` unless a newer request was made since it started,
    /// or the draft's slot no longer matches it. Returns whether it was shown.
    #[instrument(skip(self, resolution), fields(token = resolution.token))]
    pub fn apply_availability(&mut self, resolution: Resolution) -> bool {
        if !self.resolver.is_current(resolution.token) {
            debug!("Discarding stale resolution");
            return false;
        }
        let matches_draft = self.draft.slot().ok()
            == Some((resolution.request.date, resolution.request.time, resolution.request.party_size));
        if !matches_draft {
            debug!("Discarding resolution for a different slot");
            return false;
        }
        self.availability = Some(resolution);
        true
    }

    /// Requests and applies availability in one go.
    pub async fn load_availability(&mut self) -> Result<bool, BookingError> {
        let resolution = self.request_availability()?.await?;
        Ok(self.apply_availability(resolution))
    }

    pub fn availability(&self) -> Option<&[TableAvailability]> {
        self.availability.as_ref().map(|r| r.tables.as_slice())
    }

    /// Proposes a table. Only tables shown as available are accepted.
    pub fn select_table(&mut self, table_id: &str) -> Result<(), BookingError> {
        self.ensure_editable()?;
        let shown = self
            .availability()
            .and_then(|tables| tables.iter().find(|t| t.table.id == table_id))
            .ok_or_else(|| BookingError::validation("table", format!("{} is not offered for this slot", table_id)))?;
        if !shown.available {
            return Err(BookingError::validation("table", format!("{} is already booked", table_id)));
        }
        self.draft.table_id = Some(table_id.to_string());
        Ok(())
    }

    pub fn clear_table(&mut self) -> Result<(), BookingError> {
        self.ensure_editable()?;
        self.draft.table_id = None;
        Ok(())
    }

    fn mark_table(&mut self, table_id: &TableId, available: bool) -> bool {
        let Some(resolution) = self.availability.as_mut() else {
            return false;
        };
        match resolution.tables.iter_mut().find(|t| t.table.id == *table_id) {
            Some(entry) if entry.available != available => {
                entry.available = available;
                true
            }
            _ => false,
        }
    }

    // --- Realtime reservation changes ---

    /// Subscribes to reservation changes so the shown availability tracks
    /// bookings made elsewhere. Dropping the wizard ends the subscription.
    pub async fn watch_reservations(&mut self, reservations: &ReservationClient) -> Result<(), BookingError> {
        let (tx, events) = mpsc::unbounded_channel();
        let subscription = reservations
            .subscribe(move |event| {
                let _ = tx.send(event);
            })
            .await
            .map_err(|e| BookingError::ActorCommunicationError(e.to_string()))?;
        self.feed = Some(ReservationFeed {
            _subscription: subscription,
            events,
        });
        Ok(())
    }

    /// Applies every queued reservation change to the shown availability.
    /// Returns how many tables changed state.
    pub fn sync_reservation_changes(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(feed) = self.feed.as_mut() {
            while let Ok(event) = feed.events.try_recv() {
                pending.push(event);
            }
        }
        let Some((date, time)) = self.availability.as_ref().map(|r| (r.request.date, r.request.time)) else {
            return 0;
        };

        let mut changed = 0;
        for event in pending {
            let (reservation, holds) = match event {
                ResourceEvent::Created(r) | ResourceEvent::Updated(r) => {
                    let holds = r.occupies(date, time);
                    (r, holds)
                }
                ResourceEvent::Deleted(r) => (r, false),
            };
            if reservation.date != date || reservation.time != time {
                continue;
            }
            if let Some(table_id) = &reservation.table_id {
                if self.mark_table(table_id, !holds) {
                    changed += 1;
                }
            }
        }
        changed
    }

    // --- Contact and submission ---

    pub fn set_contact(&mut self, contact: Contact) -> Result<(), BookingError> {
        self.ensure_editable()?;
        self.draft.contact = contact;
        Ok(())
    }

    /// Submits the draft from the review step. On failure the draft stays as
    /// it was so the guest can correct it; a table lost to a race is shown as
    /// unavailable.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<ReservationId, BookingError> {
        if self.draft.step != WizardStep::Review {
            return Err(BookingError::InvalidStep(self.draft.step));
        }
        match self.submitter.submit(&self.draft).await {
            Ok(id) => {
                info!(reservation_id = %id, "Reservation submitted");
                self.enter(WizardStep::Submitted);
                Ok(id)
            }
            Err(BookingError::TableUnavailable(table_id)) => {
                self.mark_table(&table_id, false);
                Err(BookingError::TableUnavailable(table_id))
            }
            Err(e) => Err(e),
        }
    }
}
