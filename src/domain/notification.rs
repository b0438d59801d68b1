use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::reservation::{ReservationId, ReservationStatus};

/// Everything a downstream template needs to tell the guest about a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationNotice {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    pub customer_email: String,
    pub customer_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: u32,
    pub table_info: Option<String>,
}
