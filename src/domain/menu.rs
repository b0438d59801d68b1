use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type MenuId = String;

/// A pre-priced fixed menu from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedMenuOffering {
    pub id: MenuId,
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image_ref: Option<String>,
}

/// Payload for adding an offering to the catalog.
#[derive(Debug, Clone)]
pub struct OfferingCreate {
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image_ref: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OfferingPatch {
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
}

impl OfferingCreate {
    pub fn new(name: impl Into<String>, description: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            unit_price,
            image_ref: None,
        }
    }
}

/// How the guest intends to order. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuType {
    FixedMenu,
    ALaCarte,
    #[default]
    AtRestaurant,
}

/// A fixed menu picked into the cart. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedMenuSelection {
    pub menu_id: MenuId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// An individually chosen dish, with the price it had when picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ALaCarteItem {
    pub item_id: String,
    pub name: String,
    pub unit_price: Decimal,
}

impl ALaCarteItem {
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            unit_price,
        }
    }
}

/// Derived money figures for the current cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount_percent: u32,
    pub discount_amount: Decimal,
    pub total: Decimal,
}
