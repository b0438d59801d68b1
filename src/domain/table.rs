use serde::{Deserialize, Serialize};

pub type TableId = String;

/// A physical dining table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: TableId,
    pub name: String,
    pub capacity: u32,
    /// Free-form seating kind, e.g. "booth" or "terrace".
    pub kind: String,
    pub is_active: bool,
}

/// Payload for registering a new table.
#[derive(Debug, Clone)]
pub struct TableCreate {
    pub name: String,
    pub capacity: u32,
    pub kind: String,
}

/// Payload for updating an existing table.
#[derive(Debug, Clone, Default)]
pub struct TablePatch {
    pub name: Option<String>,
    pub capacity: Option<u32>,
    pub is_active: Option<bool>,
}

/// Filter for table listings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableQuery {
    pub min_capacity: u32,
    pub active_only: bool,
}

impl TableQuery {
    pub fn seating(min_capacity: u32) -> Self {
        Self { min_capacity, active_only: true }
    }
}

/// A candidate table together with its availability for one requested slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableAvailability {
    pub table: DiningTable,
    pub available: bool,
}

impl TableCreate {
    pub fn new(name: impl Into<String>, capacity: u32, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity,
            kind: kind.into(),
        }
    }
}
