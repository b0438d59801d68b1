use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{FixedMenuOffering, OfferingCreate, OfferingPatch};

impl Entity for FixedMenuOffering {
    type Id = String;
    type CreatePayload = OfferingCreate;
    type Patch = OfferingPatch;
    type Action = ();
    type ActionResult = ();
    type Query = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: OfferingCreate) -> Result<Self, String> {
        if payload.unit_price < Decimal::ZERO {
            return Err(format!("Negative price: {}", payload.unit_price));
        }
        Ok(Self {
            id,
            name: payload.name,
            description: payload.description,
            unit_price: payload.unit_price,
            image_ref: payload.image_ref,
        })
    }

    fn on_update(&mut self, patch: OfferingPatch) -> Result<(), String> {
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.unit_price {
            if price < Decimal::ZERO {
                return Err(format!("Negative price: {}", price));
            }
            self.unit_price = price;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }

    fn matches(&self, _query: &()) -> bool {
        true
    }
}
