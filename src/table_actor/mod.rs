//! Dining-table repository: registration, activation and seating queries.

pub mod entity;
pub mod error;

pub use error::*;
