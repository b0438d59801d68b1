//! # Table Booking
//!
//! Reservation configuration and table-availability engine for a restaurant.
//!
//! - **Collaborators** run as actors behind cloneable clients:
//!   tables → [`clients::TableClient`], reservations →
//!   [`clients::ReservationClient`], the fixed-menu catalog →
//!   [`clients::MenuClient`], guest notices → [`clients::NotificationClient`].
//! - **Engine** values hold those clients by injection:
//!   [`booking::WizardController`] walks the guest through the steps,
//!   [`booking::MenuSelectionCart`] prices the menu choice,
//!   [`booking::AvailabilityResolver`] fans out per-table checks and
//!   [`booking::ReservationSubmitter`] persists the result.
//! - [`app_system::BookingSystem`] starts and stops everything.
//!
//! ```rust,ignore
//! let system = BookingSystem::new(BookingConfig::from_env());
//! let mut wizard = system.new_wizard();
//! wizard.set_slot(date, time, 4)?;
//! wizard.advance()?;
//! ```

pub mod actor_framework;
pub mod actors;
pub mod app_system;
pub mod booking;
pub mod clients;
pub mod domain;
pub mod error;
pub mod menu_actor;
pub mod messages;
pub mod reservation_actor;
pub mod table_actor;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
