use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::{ALaCarteItem, FixedMenuOffering, FixedMenuSelection, MenuId, MenuType, Totals};

/// Flat discount for guests who pick their menu online.
pub const ONLINE_DISCOUNT_PERCENT: u32 = 10;

const CURRENCY_PLACES: u32 = 2;

/// A checkbox toggle on one menu type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTypeChange {
    pub menu_type: MenuType,
    pub checked: bool,
}

/// Resolves a menu-type toggle against the current selection.
///
/// Checking a type makes it the only active one. Unchecking the active type
/// falls back to `AtRestaurant`; unchecking an inactive one changes nothing.
pub fn reduce_menu_type(current: MenuType, change: MenuTypeChange) -> MenuType {
    match change {
        MenuTypeChange { menu_type, checked: true } => menu_type,
        MenuTypeChange { menu_type, checked: false } if menu_type == current => MenuType::AtRestaurant,
        MenuTypeChange { checked: false, .. } => current,
    }
}

fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// The guest's menu choice and the dishes picked under it.
///
/// Switching type keeps the inactive lists around so toggling back restores
/// them; only the active type's selections count toward totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuSelectionCart {
    menu_type: MenuType,
    chosen: bool,
    fixed_menus: Vec<FixedMenuSelection>,
    a_la_carte: Vec<ALaCarteItem>,
}

impl MenuSelectionCart {
    pub fn menu_type(&self) -> MenuType {
        self.menu_type
    }

    /// Whether a menu type was ever set explicitly.
    pub fn is_chosen(&self) -> bool {
        self.chosen
    }

    pub fn fixed_menus(&self) -> &[FixedMenuSelection] {
        &self.fixed_menus
    }

    pub fn a_la_carte_items(&self) -> &[ALaCarteItem] {
        &self.a_la_carte
    }

    pub fn select_menu_type(&mut self, menu_type: MenuType, checked: bool) -> MenuType {
        self.menu_type = reduce_menu_type(self.menu_type, MenuTypeChange { menu_type, checked });
        self.chosen = true;
        self.menu_type
    }

    /// Adds one cover of `offering`, returning the new quantity.
    pub fn add_or_increment_fixed_menu(&mut self, offering: &FixedMenuOffering) -> u32 {
        if let Some(existing) = self.fixed_menus.iter_mut().find(|s| s.menu_id == offering.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }
        self.fixed_menus.push(FixedMenuSelection {
            menu_id: offering.id.clone(),
            name: offering.name.clone(),
            unit_price: offering.unit_price,
            quantity: 1,
        });
        1
    }

    /// Applies `delta` to a selection's quantity. Returns the new quantity, or
    /// `None` when the entry was removed (or never present).
    pub fn change_fixed_menu_quantity(&mut self, menu_id: &str, delta: i64) -> Option<u32> {
        let index = self.fixed_menus.iter().position(|s| s.menu_id == menu_id)?;
        let next = i64::from(self.fixed_menus[index].quantity) + delta;
        if next <= 0 {
            self.fixed_menus.remove(index);
            return None;
        }
        let quantity = u32::try_from(next).unwrap_or(u32::MAX);
        self.fixed_menus[index].quantity = quantity;
        Some(quantity)
    }

    pub fn remove_fixed_menu(&mut self, menu_id: &MenuId) -> bool {
        let before = self.fixed_menus.len();
        self.fixed_menus.retain(|s| s.menu_id != *menu_id);
        self.fixed_menus.len() != before
    }

    pub fn set_a_la_carte_selection(&mut self, items: Vec<ALaCarteItem>) {
        self.a_la_carte = items;
    }

    /// Number of entries picked under the active menu type.
    pub fn active_selection_count(&self) -> usize {
        match self.menu_type {
            MenuType::FixedMenu => self.fixed_menus.len(),
            MenuType::ALaCarte => self.a_la_carte.len(),
            MenuType::AtRestaurant => 0,
        }
    }

    pub fn discount_percent(&self) -> u32 {
        match self.menu_type {
            MenuType::FixedMenu | MenuType::ALaCarte => ONLINE_DISCOUNT_PERCENT,
            MenuType::AtRestaurant => 0,
        }
    }

    pub fn compute_totals(&self) -> Totals {
        let subtotal = match self.menu_type {
            MenuType::FixedMenu => self
                .fixed_menus
                .iter()
                .map(|s| s.unit_price * Decimal::from(s.quantity))
                .sum(),
            MenuType::ALaCarte => self.a_la_carte.iter().map(|item| item.unit_price).sum(),
            MenuType::AtRestaurant => Decimal::ZERO,
        };
        let subtotal = round_currency(subtotal);
        let discount_percent = self.discount_percent();
        let total = round_currency(
            subtotal * Decimal::from(100 - discount_percent) / Decimal::ONE_HUNDRED,
        );

        Totals {
            subtotal,
            discount_percent,
            discount_amount: subtotal - total,
            total,
        }
    }
}
