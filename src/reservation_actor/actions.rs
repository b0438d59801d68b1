use crate::domain::{FixedMenuSelection, TableId};

/// Association actions applied right after a reservation is persisted.
#[derive(Debug, Clone)]
pub enum ReservationAction {
    /// Attach the pre-selected fixed menus.
    LinkFixedMenus(Vec<FixedMenuSelection>),
    /// Attach the table the reservation holds.
    LinkTable(TableId),
}

/// Results from ReservationActions - variants match 1:1 with ReservationAction
#[derive(Debug, Clone, PartialEq)]
pub enum ReservationActionResult {
    /// Number of fixed-menu links now held
    LinkFixedMenus(usize),
    LinkTable(()),
}
