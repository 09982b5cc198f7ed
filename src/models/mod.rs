//! Domain records persisted by the ledgers.
//!
//! Field names serialize in camelCase so the stored JSON keeps the exact shape
//! the dashboard has always written (`unitPrice`, `barId`, `minimumLevel`, ...).

pub mod alert;
pub mod bar;
pub mod inventory;
pub mod menu;
pub mod sale;
pub mod transfer;
pub mod user;

pub use alert::{AlertKind, InventoryAlert};
pub use bar::{Bar, BarDirectory};
pub use inventory::{InventoryItem, NewInventoryItem};
pub use menu::{Ingredient, MenuItem, NewMenuItem};
pub use sale::Sale;
pub use transfer::TransferRecord;
pub use user::{Role, User};

/// Generates a fresh record id with a readable prefix, e.g. `item-3f2a...`.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
