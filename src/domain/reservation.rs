use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::menu::{ALaCarteItem, FixedMenuSelection, MenuType, Totals};
use super::table::TableId;

pub type ReservationId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// A persisted reservation. Immutable apart from its status and the
/// table/menu associations linked right after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub party_size: u32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub menu_type: MenuType,
    pub a_la_carte_items: Vec<ALaCarteItem>,
    pub fixed_menus: Vec<FixedMenuSelection>,
    pub table_id: Option<TableId>,
    pub totals: Totals,
    pub contact: Contact,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for persisting a new reservation.
#[derive(Debug, Clone)]
pub struct ReservationCreate {
    pub party_size: u32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub menu_type: MenuType,
    pub a_la_carte_items: Vec<ALaCarteItem>,
    pub totals: Totals,
    pub contact: Contact,
}

/// Status transition request.
#[derive(Debug, Clone, Copy)]
pub struct ReservationPatch {
    pub status: ReservationStatus,
}

/// Filter for reservation listings.
#[derive(Debug, Clone, Default)]
pub struct ReservationQuery {
    pub table_id: Option<TableId>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub include_cancelled: bool,
}

impl ReservationQuery {
    /// Active reservations holding `table_id` at exactly `date` and `time`.
    pub fn occupying(table_id: impl Into<TableId>, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            table_id: Some(table_id.into()),
            date: Some(date),
            time: Some(time),
            include_cancelled: false,
        }
    }
}

impl Reservation {
    /// Whether this booking holds its table at the given slot.
    pub fn occupies(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.status != ReservationStatus::Cancelled && self.date == date && self.time == time
    }
}
