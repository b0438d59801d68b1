use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, instrument};
use crate::actor_framework::{FrameworkError, ResourceClient, ResourceEvent, Subscription};
use crate::domain::{
    FixedMenuSelection, Reservation, ReservationCreate, ReservationId, ReservationPatch,
    ReservationQuery, ReservationStatus, TableId,
};
use crate::reservation_actor::{ReservationAction, ReservationActionResult, ReservationError};

impl From<FrameworkError> for ReservationError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => ReservationError::NotFound(id),
            FrameworkError::Rejected(reason) => ReservationError::Rejected(reason),
            FrameworkError::Conflict(reason) => ReservationError::Conflict(reason),
            other => ReservationError::ActorCommunicationError(other.to_string()),
        }
    }
}

/// Client for the reservation repository.
#[derive(Clone)]
pub struct ReservationClient {
    inner: ResourceClient<Reservation>,
}

impl_basic_client!(ReservationClient, Reservation, ReservationError, reservation, deletable);

impl ReservationClient {
    #[instrument(skip(self, record), fields(party_size = record.party_size, date = %record.date, time = %record.time))]
    pub async fn persist_reservation(&self, record: ReservationCreate) -> Result<ReservationId, ReservationError> {
        debug!("Sending request");
        self.inner.create(record).await.map_err(ReservationError::from)
    }

    /// True when no active reservation holds `table_id` at exactly `date` and `time`.
    #[instrument(skip(self))]
    pub async fn check_table_availability(
        &self,
        table_id: TableId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, ReservationError> {
        debug!("Sending request");
        let holders = self
            .inner
            .list(ReservationQuery::occupying(table_id, date, time))
            .await
            .map_err(ReservationError::from)?;
        Ok(holders.is_empty())
    }

    #[instrument(skip(self, selections), fields(selection_count = selections.len()))]
    pub async fn link_fixed_menus(
        &self,
        id: ReservationId,
        selections: Vec<FixedMenuSelection>,
    ) -> Result<usize, ReservationError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ReservationAction::LinkFixedMenus(selections)).await {
            Ok(ReservationActionResult::LinkFixedMenus(count)) => Ok(count),
            Ok(_) => Err(ReservationError::ActorCommunicationError("Unexpected result".to_string())),
            Err(e) => Err(ReservationError::from(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn link_table(&self, id: ReservationId, table_id: TableId) -> Result<(), ReservationError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ReservationAction::LinkTable(table_id)).await {
            Ok(ReservationActionResult::LinkTable(())) => Ok(()),
            Ok(_) => Err(ReservationError::ActorCommunicationError("Unexpected result".to_string())),
            Err(e) => Err(ReservationError::from(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn confirm_reservation(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        debug!("Sending request");
        self.set_status(id, ReservationStatus::Confirmed).await
    }

    #[instrument(skip(self))]
    pub async fn cancel_reservation(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        debug!("Sending request");
        self.set_status(id, ReservationStatus::Cancelled).await
    }

    async fn set_status(&self, id: ReservationId, status: ReservationStatus) -> Result<Reservation, ReservationError> {
        self.inner
            .update(id, ReservationPatch { status })
            .await
            .map_err(ReservationError::from)
    }

    /// Push every reservation change to `handler` until the guard is dropped.
    pub async fn subscribe(
        &self,
        handler: impl Fn(ResourceEvent<Reservation>) + Send + 'static,
    ) -> Result<Subscription<Reservation>, ReservationError> {
        self.inner.subscribe(handler).await.map_err(ReservationError::from)
    }
}
