//! Menu ledger - Drinks and dishes offered at each bar.
//!
//! Ingredient references are stored as given; deleting the inventory item
//! they point at leaves them dangling.

use crate::{
    core::session::Session,
    errors::{Error, Result},
    models::{BarDirectory, MenuItem, NewMenuItem, new_id},
    store::{KvStore, MENU_KEY, clear_collection, load_collection, save_collection},
};
use tracing::info;

/// Retrieves every menu item in stored order.
pub async fn get_all_menu_items<S: KvStore>(store: &S) -> Result<Vec<MenuItem>> {
    load_collection(store, MENU_KEY).await
}

fn validate_menu_item(draft: &NewMenuItem, bars: &BarDirectory) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(Error::validation("name", "Name is required"));
    }
    if !draft.price.is_finite() || draft.price <= 0.0 {
        return Err(Error::validation("price", "Price must be greater than 0"));
    }
    if draft
        .ingredients
        .iter()
        .any(|ingredient| !ingredient.quantity.is_finite() || ingredient.quantity <= 0.0)
    {
        return Err(Error::validation(
            "ingredients",
            "Ingredient quantities must be greater than 0",
        ));
    }
    bars.require(&draft.bar_id)?;
    Ok(())
}

/// Adds a menu item with a fresh id.
///
/// # Errors
/// Returns an error if:
/// - The session user is not a manager
/// - The name is empty, the price is not positive, or the bar is unknown
pub async fn add_menu_item<S: KvStore>(
    store: &S,
    session: &Session,
    bars: &BarDirectory,
    draft: NewMenuItem,
) -> Result<MenuItem> {
    let actor = session.require_manager("add menu items")?;
    validate_menu_item(&draft, bars)?;

    let item = draft.into_item(new_id("menu"));
    let mut menu = get_all_menu_items(store).await?;
    menu.push(item.clone());
    save_collection(store, MENU_KEY, &menu).await?;

    info!(
        "{} has been added to the menu at {} by {}",
        item.name,
        bars.name_of(&item.bar_id),
        actor.name
    );
    Ok(item)
}

/// Marks a menu item as available or unavailable.
pub async fn set_menu_item_availability<S: KvStore>(
    store: &S,
    session: &Session,
    id: &str,
    available: bool,
) -> Result<MenuItem> {
    let actor = session.require_manager("change menu availability")?;

    let mut menu = get_all_menu_items(store).await?;
    let item = menu
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| Error::MenuItemNotFound { id: id.to_string() })?;
    item.available = available;
    let updated = item.clone();
    save_collection(store, MENU_KEY, &menu).await?;

    info!(
        "{} marked {} by {}",
        updated.name,
        if available { "available" } else { "unavailable" },
        actor.name
    );
    Ok(updated)
}

pub async fn delete_menu_item<S: KvStore>(
    store: &S,
    session: &Session,
    id: &str,
) -> Result<MenuItem> {
    let actor = session.require_manager("delete menu items")?;

    let mut menu = get_all_menu_items(store).await?;
    let index = menu
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| Error::MenuItemNotFound { id: id.to_string() })?;
    let removed = menu.remove(index);
    save_collection(store, MENU_KEY, &menu).await?;

    info!("{} removed from the menu by {}", removed.name, actor.name);
    Ok(removed)
}

/// Clears the whole menu.
pub async fn reset_menu<S: KvStore>(store: &S, session: &Session) -> Result<()> {
    let actor = session.require_manager("reset the menu")?;
    clear_collection(store, MENU_KEY).await?;
    info!("Menu has been reset by {}", actor.name);
    Ok(())
}

/// Menu table filters. `None` and empty strings match everything.
#[derive(Debug, Clone, Default)]
pub struct MenuQuery {
    pub search: String,
    pub category: Option<String>,
    pub bar_id: Option<String>,
    pub available_only: bool,
}

#[must_use]
pub fn query_menu_items(menu: &[MenuItem], query: &MenuQuery) -> Vec<MenuItem> {
    let needle = query.search.to_lowercase();
    menu.iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .filter(|item| query.category.as_ref().is_none_or(|c| &item.category == c))
        .filter(|item| query.bar_id.as_ref().is_none_or(|b| &item.bar_id == b))
        .filter(|item| !query.available_only || item.available)
        .cloned()
        .collect()
}

/// Distinct menu categories in first-seen order.
#[must_use]
pub fn menu_categories(menu: &[MenuItem]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in menu {
        if !seen.contains(&item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}
