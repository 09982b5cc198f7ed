//! Inventory ledger - Handles all inventory-item operations.
//!
//! Every mutation follows the same shape: policy check, validation, load the
//! whole collection, change it in memory, write it back. A rejected operation
//! never reaches the store.

use crate::{
    core::session::Session,
    errors::{Error, Result},
    models::{BarDirectory, InventoryItem, NewInventoryItem, new_id},
    store::{INVENTORY_KEY, KvStore, clear_collection, load_collection, save_collection},
};
use tracing::info;

/// Retrieves every inventory item across all bars, in stored order.
pub async fn get_all_items<S: KvStore>(store: &S) -> Result<Vec<InventoryItem>> {
    load_collection(store, INVENTORY_KEY).await
}

/// Finds an item by id, returning None if it is not in the collection.
pub async fn get_item_by_id<S: KvStore>(store: &S, id: &str) -> Result<Option<InventoryItem>> {
    Ok(get_all_items(store)
        .await?
        .into_iter()
        .find(|item| item.id == id))
}

/// Retrieves the items stocked at one bar.
pub async fn get_items_for_bar<S: KvStore>(store: &S, bar_id: &str) -> Result<Vec<InventoryItem>> {
    Ok(get_all_items(store)
        .await?
        .into_iter()
        .filter(|item| item.bar_id == bar_id)
        .collect())
}

/// Checks the add-item form rules.
///
/// # Errors
/// Returns a validation error when:
/// - The name or unit is empty
/// - The quantity is zero
/// - The unit price is not a positive finite number
/// - The tax rate is negative or not finite
/// - The bar is not one of the configured bars
pub fn validate_new_item(draft: &NewInventoryItem, bars: &BarDirectory) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(Error::validation("name", "Name is required"));
    }
    if draft.quantity == 0 {
        return Err(Error::validation("quantity", "Quantity must be greater than 0"));
    }
    if !draft.unit_price.is_finite() || draft.unit_price <= 0.0 {
        return Err(Error::validation("unitPrice", "Price must be greater than 0"));
    }
    if draft.unit.trim().is_empty() {
        return Err(Error::validation("unit", "Unit is required"));
    }
    validate_tax_rate(draft.tax_rate)?;
    bars.require(&draft.bar_id)?;
    Ok(())
}

/// Checks the edit form rules, which are looser than the add rules: numbers
/// only need to be non-negative.
pub fn validate_item_edit(item: &InventoryItem, bars: &BarDirectory) -> Result<()> {
    if item.name.trim().chars().count() < 2 {
        return Err(Error::validation(
            "name",
            "Name must be at least 2 characters.",
        ));
    }
    if item.category.trim().is_empty() {
        return Err(Error::validation("category", "Category is required."));
    }
    if !item.unit_price.is_finite() || item.unit_price < 0.0 {
        return Err(Error::validation(
            "unitPrice",
            "Price must be a positive number.",
        ));
    }
    if item.unit.trim().is_empty() {
        return Err(Error::validation("unit", "Unit is required."));
    }
    validate_tax_rate(item.tax_rate)?;
    bars.require(&item.bar_id)?;
    Ok(())
}

fn validate_tax_rate(tax_rate: Option<f64>) -> Result<()> {
    match tax_rate {
        Some(rate) if !rate.is_finite() || rate < 0.0 => Err(Error::validation(
            "taxRate",
            "Tax rate must be a non-negative percentage",
        )),
        _ => Ok(()),
    }
}

/// Adds a new item with a fresh id and the default tax rate when none is given.
///
/// # Errors
/// Returns an error if:
/// - The session user is not a manager
/// - The form fails [`validate_new_item`]
/// - The store cannot be read or written
pub async fn add_item<S: KvStore>(
    store: &S,
    session: &Session,
    bars: &BarDirectory,
    draft: NewInventoryItem,
) -> Result<InventoryItem> {
    let actor = session.require_manager("add inventory items")?;
    validate_new_item(&draft, bars)?;

    let item = draft.into_item(new_id("item"));
    let mut items = get_all_items(store).await?;
    items.push(item.clone());
    save_collection(store, INVENTORY_KEY, &items).await?;

    info!(
        "{} has been added to inventory at bar {} by {}",
        item.name, item.bar_id, actor.name
    );
    Ok(item)
}

/// Replaces the stored item that has the same id.
///
/// # Errors
/// Returns an error if:
/// - The session user is not a manager
/// - The edit fails [`validate_item_edit`]
/// - No item with that id exists
pub async fn edit_item<S: KvStore>(
    store: &S,
    session: &Session,
    bars: &BarDirectory,
    updated: InventoryItem,
) -> Result<InventoryItem> {
    let actor = session.require_manager("edit inventory items")?;
    validate_item_edit(&updated, bars)?;

    let mut items = get_all_items(store).await?;
    let slot = items
        .iter_mut()
        .find(|item| item.id == updated.id)
        .ok_or_else(|| Error::ItemNotFound {
            id: updated.id.clone(),
        })?;
    *slot = updated.clone();
    save_collection(store, INVENTORY_KEY, &items).await?;

    info!("{} has been updated by {}", updated.name, actor.name);
    Ok(updated)
}

/// Removes an item and returns it.
pub async fn delete_item<S: KvStore>(
    store: &S,
    session: &Session,
    id: &str,
) -> Result<InventoryItem> {
    let actor = session.require_manager("delete inventory items")?;

    let mut items = get_all_items(store).await?;
    let index = items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| Error::ItemNotFound { id: id.to_string() })?;
    let removed = items.remove(index);
    save_collection(store, INVENTORY_KEY, &items).await?;

    info!("{} has been deleted by {}", removed.name, actor.name);
    Ok(removed)
}

/// Deletes every inventory item at every bar. Irreversible.
pub async fn reset_inventory<S: KvStore>(store: &S, session: &Session) -> Result<()> {
    let actor = session.require_manager("reset inventory")?;
    clear_collection(store, INVENTORY_KEY).await?;
    info!("All inventory items have been deleted by {}", actor.name);
    Ok(())
}

/// Column the inventory table is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Quantity,
    UnitPrice,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Table filters. Empty search and `None` filters match everything.
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    pub search: String,
    pub category: Option<String>,
    pub bar_id: Option<String>,
    pub sort: SortField,
    pub direction: SortDirection,
}

/// Applies search, category and bar filters, then sorts.
#[must_use]
pub fn query_items(items: &[InventoryItem], query: &InventoryQuery) -> Vec<InventoryItem> {
    let needle = query.search.to_lowercase();
    let mut matches: Vec<InventoryItem> = items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .filter(|item| query.category.as_ref().is_none_or(|c| &item.category == c))
        .filter(|item| query.bar_id.as_ref().is_none_or(|b| &item.bar_id == b))
        .cloned()
        .collect();

    matches.sort_by(|a, b| {
        let ordering = match query.sort {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Quantity => a.quantity.cmp(&b.quantity),
            SortField::UnitPrice => a.unit_price.total_cmp(&b.unit_price),
        };
        match query.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    matches
}

/// Distinct categories in first-seen order.
#[must_use]
pub fn categories(items: &[InventoryItem]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.contains(&item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}
