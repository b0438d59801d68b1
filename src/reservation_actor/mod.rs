//! Reservation repository: persistence, join associations, status lifecycle
//! and exact-slot occupancy queries.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
