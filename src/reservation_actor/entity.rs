use chrono::Utc;

use super::actions::{ReservationAction, ReservationActionResult};
use crate::actor_framework::Entity;
use crate::domain::{
    Reservation, ReservationCreate, ReservationPatch, ReservationQuery, ReservationStatus,
};

impl Entity for Reservation {
    type Id = String;
    type CreatePayload = ReservationCreate;
    type Patch = ReservationPatch;
    type Action = ReservationAction;
    type ActionResult = ReservationActionResult;
    type Query = ReservationQuery;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Reservation from creation parameters.
    ///
    /// # Notes
    /// The reservation is initialized with status `Pending` and no table or
    /// fixed-menu links; those are attached with [`ReservationAction`]s.
    fn from_create(id: String, payload: ReservationCreate) -> Result<Self, String> {
        if payload.party_size == 0 {
            return Err("Party size must be at least 1".to_string());
        }
        Ok(Self {
            id,
            party_size: payload.party_size,
            date: payload.date,
            time: payload.time,
            menu_type: payload.menu_type,
            a_la_carte_items: payload.a_la_carte_items,
            fixed_menus: Vec::new(),
            table_id: None,
            totals: payload.totals,
            contact: payload.contact,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Applies a status transition.
    ///
    /// # Errors
    /// A cancelled reservation cannot change status again, and a reservation
    /// never moves back to `Pending`.
    fn on_update(&mut self, patch: ReservationPatch) -> Result<(), String> {
        use ReservationStatus::*;
        match (self.status, patch.status) {
            (Cancelled, _) => Err(format!("Reservation {} is cancelled", self.id)),
            (_, Pending) => Err("Cannot move a reservation back to Pending".to_string()),
            (_, next) => {
                self.status = next;
                Ok(())
            }
        }
    }

    fn handle_action(&mut self, action: ReservationAction) -> Result<ReservationActionResult, String> {
        match action {
            ReservationAction::LinkFixedMenus(selections) => {
                if selections.iter().any(|s| s.quantity == 0) {
                    return Err("Fixed menu quantity must be at least 1".to_string());
                }
                self.fixed_menus.extend(selections);
                Ok(ReservationActionResult::LinkFixedMenus(self.fixed_menus.len()))
            }
            ReservationAction::LinkTable(table_id) => match &self.table_id {
                Some(existing) if *existing != table_id => Err(format!(
                    "Reservation {} already holds table {}",
                    self.id, existing
                )),
                _ => {
                    self.table_id = Some(table_id);
                    Ok(ReservationActionResult::LinkTable(()))
                }
            },
        }
    }

    fn matches(&self, query: &ReservationQuery) -> bool {
        if !query.include_cancelled && self.status == ReservationStatus::Cancelled {
            return false;
        }
        if let Some(table_id) = &query.table_id {
            if self.table_id.as_ref() != Some(table_id) {
                return false;
            }
        }
        query.date.map_or(true, |date| self.date == date)
            && query.time.map_or(true, |time| self.time == time)
    }

    /// An active reservation may not hold a table another active reservation
    /// holds at the same date and time.
    fn conflicts_with(&self, other: &Reservation) -> Option<String> {
        let table_id = self.table_id.as_ref()?;
        if self.status == ReservationStatus::Cancelled {
            return None;
        }
        (other.table_id.as_ref() == Some(table_id) && other.occupies(self.date, self.time))
            .then(|| format!("Table {} is already held by reservation {}", table_id, other.id))
    }
}
