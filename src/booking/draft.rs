use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::cart::MenuSelectionCart;
use crate::domain::{Contact, MenuType, TableId, Totals};
use crate::error::BookingError;

/// Stages of the reservation flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum WizardStep {
    #[default]
    DateTime,
    MenuSelection,
    TableSelection,
    ContactInfo,
    Review,
    Submitted,
}

impl WizardStep {
    /// The step `advance` moves to. `Review` and `Submitted` have none:
    /// leaving `Review` happens only through a submission.
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::DateTime => Some(WizardStep::MenuSelection),
            WizardStep::MenuSelection => Some(WizardStep::TableSelection),
            WizardStep::TableSelection => Some(WizardStep::ContactInfo),
            WizardStep::ContactInfo => Some(WizardStep::Review),
            WizardStep::Review | WizardStep::Submitted => None,
        }
    }

    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::DateTime | WizardStep::Submitted => None,
            WizardStep::MenuSelection => Some(WizardStep::DateTime),
            WizardStep::TableSelection => Some(WizardStep::MenuSelection),
            WizardStep::ContactInfo => Some(WizardStep::TableSelection),
            WizardStep::Review => Some(WizardStep::ContactInfo),
        }
    }
}

/// The reservation being configured. Owned by one wizard for its lifetime.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReservationDraft {
    pub party_size: Option<u32>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub cart: MenuSelectionCart,
    pub table_id: Option<TableId>,
    pub contact: Contact,
    pub step: WizardStep,
}

impl ReservationDraft {
    /// Money figures derived from the cart as it is right now.
    pub fn totals(&self) -> Totals {
        self.cart.compute_totals()
    }

    /// The concrete slot, once date, time and a positive party size are set.
    pub fn slot(&self) -> Result<(NaiveDate, NaiveTime, u32), BookingError> {
        let party_size = match self.party_size {
            Some(size) if size >= 1 => size,
            Some(_) => return Err(BookingError::validation("party_size", "must be at least 1")),
            None => return Err(BookingError::validation("party_size", "required")),
        };
        let date = self.date.ok_or_else(|| BookingError::validation("date", "required"))?;
        let time = self.time.ok_or_else(|| BookingError::validation("time", "required"))?;
        Ok((date, time, party_size))
    }

    /// Checks the fields `step` requires before the wizard may leave it.
    pub fn check_step(&self, step: WizardStep) -> Result<(), BookingError> {
        match step {
            WizardStep::DateTime => self.slot().map(|_| ()),
            WizardStep::MenuSelection => self.check_menu(),
            WizardStep::TableSelection => Ok(()),
            WizardStep::ContactInfo => self.check_contact(),
            WizardStep::Review | WizardStep::Submitted => Err(BookingError::InvalidStep(step)),
        }
    }

    /// Everything a submission needs, reporting the first missing field.
    pub fn check_complete(&self) -> Result<(), BookingError> {
        self.slot()?;
        self.check_contact()?;
        self.check_menu()
    }

    fn check_menu(&self) -> Result<(), BookingError> {
        if self.cart.menu_type() != MenuType::AtRestaurant && self.cart.active_selection_count() == 0 {
            return Err(BookingError::validation(
                "menu_selection",
                "choose at least one dish or order at the restaurant",
            ));
        }
        Ok(())
    }

    fn check_contact(&self) -> Result<(), BookingError> {
        let contact = &self.contact;
        if contact.name.trim().is_empty() {
            return Err(BookingError::validation("contact.name", "required"));
        }
        if contact.email.trim().is_empty() {
            return Err(BookingError::validation("contact.email", "required"));
        }
        if !contact.email.contains('@') {
            return Err(BookingError::validation("contact.email", "not an email address"));
        }
        if contact.phone.trim().is_empty() {
            return Err(BookingError::validation("contact.phone", "required"));
        }
        Ok(())
    }
}
