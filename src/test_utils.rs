//! Shared test utilities for `barkeep`.
//!
//! Helpers for building stores, sessions and inventory records with sensible
//! defaults so individual tests only spell out what they care about.

use crate::{
    core::session::Session,
    errors::Result,
    models::{InventoryItem, NewInventoryItem, Role, User},
    store::{INVENTORY_KEY, KvStore, MemoryStore, SeaOrmStore, save_collection},
};

/// Tolerance for money comparisons.
pub const EPSILON: f64 = 1e-9;

#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Creates an in-memory `SQLite` database with the key-value table initialized.
pub async fn setup_sea_store() -> Result<SeaOrmStore> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(SeaOrmStore::new(db))
}

fn session_for(id: &str, name: &str, role: Role, bar_id: Option<&str>) -> Session {
    Session::for_user(User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@hotel.com", role),
        role,
        bar_id: bar_id.map(str::to_string),
    })
}

#[must_use]
pub fn manager_session() -> Session {
    session_for("1", "John Manager", Role::Manager, None)
}

#[must_use]
pub fn bartender_session() -> Session {
    session_for("2", "Alice Bartender", Role::Bartender, Some("1"))
}

#[must_use]
pub fn inventory_staff_session() -> Session {
    session_for("3", "Bob Inventory", Role::InventoryStaff, None)
}

/// Creates a stored inventory record with sensible defaults.
///
/// # Defaults
/// * `id`: `"{name}-{bar_id}"` (lowercased)
/// * `category`: `"Spirits"`
/// * `unit`: `"bottle"`
/// * `unit_price`: 20.0
/// * `tax_rate`: 19.0
#[must_use]
pub fn sample_item(name: &str, bar_id: &str, quantity: u32, minimum_level: u32) -> InventoryItem {
    InventoryItem {
        id: format!("{}-{}", name.to_lowercase(), bar_id),
        name: name.to_string(),
        category: "Spirits".to_string(),
        quantity,
        unit: "bottle".to_string(),
        unit_price: 20.0,
        bar_id: bar_id.to_string(),
        supplier_id: Some("sup-1".to_string()),
        expiration_date: None,
        minimum_level,
        tax_rate: Some(19.0),
        image: None,
    }
}

/// Creates form input for a new item with the same defaults as [`sample_item`].
#[must_use]
pub fn new_item(name: &str, bar_id: &str, quantity: u32) -> NewInventoryItem {
    NewInventoryItem {
        name: name.to_string(),
        category: "Spirits".to_string(),
        quantity,
        unit: "bottle".to_string(),
        unit_price: 20.0,
        bar_id: bar_id.to_string(),
        supplier_id: None,
        expiration_date: None,
        minimum_level: 5,
        tax_rate: None,
        image: None,
    }
}

/// Sets up a memory store already holding `items` in the inventory collection.
pub async fn setup_with_items(items: &[InventoryItem]) -> Result<MemoryStore> {
    let store = MemoryStore::new();
    save_collection(&store, INVENTORY_KEY, items).await?;
    Ok(store)
}

/// Sum of quantities of one logical product across all bars.
pub async fn total_quantity<S: KvStore>(store: &S, name: &str) -> Result<u32> {
    let items: Vec<InventoryItem> = crate::store::load_collection(store, INVENTORY_KEY).await?;
    Ok(items
        .iter()
        .filter(|item| item.name == name)
        .map(|item| item.quantity)
        .sum())
}
