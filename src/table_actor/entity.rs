use crate::actor_framework::Entity;
use crate::domain::{DiningTable, TableCreate, TablePatch, TableQuery};

impl Entity for DiningTable {
    type Id = String;
    type CreatePayload = TableCreate;
    type Patch = TablePatch;
    type Action = ();
    type ActionResult = ();
    type Query = TableQuery;

    fn id(&self) -> &String {
        &self.id
    }

    /// New tables start active.
    ///
    /// # Errors
    /// Rejects a blank name or a zero capacity.
    fn from_create(id: String, payload: TableCreate) -> Result<Self, String> {
        if payload.name.trim().is_empty() {
            return Err("Table name required".to_string());
        }
        if payload.capacity == 0 {
            return Err("Table capacity must be at least 1".to_string());
        }
        Ok(Self {
            id,
            name: payload.name,
            capacity: payload.capacity,
            kind: payload.kind,
            is_active: true,
        })
    }

    fn on_update(&mut self, patch: TablePatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(capacity) = patch.capacity {
            if capacity == 0 {
                return Err("Table capacity must be at least 1".to_string());
            }
            self.capacity = capacity;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }

    fn matches(&self, query: &TableQuery) -> bool {
        (!query.active_only || self.is_active) && self.capacity >= query.min_capacity
    }
}
