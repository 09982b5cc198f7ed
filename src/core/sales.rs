//! Sales ledger - Records point-of-sale transactions against inventory.
//!
//! A sale's total is always derived: `amount × quantity × (1 + taxRate/100)`,
//! with the tax rate taken from the matching inventory item at the sale's bar
//! (zero when nothing matches). Adding a sale consumes stock; editing or
//! deleting one never touches inventory again.

use crate::{
    core::session::Session,
    errors::{Error, Result},
    models::{BarDirectory, InventoryItem, Sale, new_id},
    store::{
        INVENTORY_KEY, KvStore, SALES_KEY, clear_collection, load_collection, save_collection,
    },
};
use chrono::Utc;
use tracing::{info, warn};

/// How the sold product is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    /// An inventory item id; it must exist at the sale's bar
    ItemId(String),
    /// A product name matched exactly against the sale bar's inventory
    Name(String),
}

/// Input for [`add_sale`].
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub bar_id: String,
    pub product: ProductRef,
    /// Unit price override. Required when the product is not stocked at the bar.
    pub amount: Option<f64>,
    pub quantity: u32,
    pub staff_name: String,
}

/// Tax rate of the item named `name` at `bar_id`, or zero without a match.
#[must_use]
pub fn tax_rate_for(items: &[InventoryItem], bar_id: &str, name: &str) -> f64 {
    items
        .iter()
        .find(|item| item.bar_id == bar_id && item.name == name)
        .map_or(0.0, InventoryItem::effective_tax_rate)
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::validation("amount", "Amount must be greater than 0"));
    }
    Ok(())
}

fn validate_common(bar_id: &str, quantity: u32, staff_name: &str) -> Result<()> {
    if bar_id.trim().is_empty() {
        return Err(Error::validation("barId", "Please select a bar"));
    }
    if staff_name.trim().is_empty() {
        return Err(Error::validation("staffName", "Please select a staff member"));
    }
    if quantity == 0 {
        return Err(Error::validation("quantity", "Quantity must be greater than 0"));
    }
    Ok(())
}

/// Retrieves all sales, newest first as stored.
pub async fn get_all_sales<S: KvStore>(store: &S) -> Result<Vec<Sale>> {
    load_collection(store, SALES_KEY).await
}

/// Records a sale and decrements the matched inventory item.
///
/// The stock decrement is clamped at zero: a sale larger than the remaining
/// stock empties the item instead of failing.
///
/// # Errors
/// Returns an error if:
/// - The session user is not a manager
/// - The bar, product, staff name or quantity is missing or invalid
/// - An item id is given that does not exist at the sale's bar
/// - No unit price can be determined for an unstocked product
pub async fn add_sale<S: KvStore>(
    store: &S,
    session: &Session,
    bars: &BarDirectory,
    draft: SaleDraft,
) -> Result<Sale> {
    let actor = session.require_manager("add sales")?;
    validate_common(&draft.bar_id, draft.quantity, &draft.staff_name)?;
    let bar = bars.require(&draft.bar_id)?;
    if let Some(amount) = draft.amount {
        validate_amount(amount)?;
    }

    let mut items: Vec<InventoryItem> = load_collection(store, INVENTORY_KEY).await?;
    let matched = match &draft.product {
        ProductRef::ItemId(id) => {
            let index = items
                .iter()
                .position(|item| &item.id == id && item.bar_id == draft.bar_id)
                .ok_or_else(|| Error::ItemNotFound { id: id.clone() })?;
            Some(index)
        }
        ProductRef::Name(name) => {
            if name.trim().is_empty() {
                return Err(Error::validation("product", "Please select a product"));
            }
            items
                .iter()
                .position(|item| &item.name == name && item.bar_id == draft.bar_id)
        }
    };

    let (product_name, amount, tax_rate) = match (matched, &draft.product) {
        (Some(index), _) => {
            let item = &items[index];
            (
                item.name.clone(),
                draft.amount.unwrap_or(item.unit_price),
                item.effective_tax_rate(),
            )
        }
        (None, ProductRef::Name(name)) => {
            let amount = draft.amount.ok_or_else(|| {
                Error::validation(
                    "amount",
                    format!("{name} is not stocked at {}; enter a unit price", bar.name),
                )
            })?;
            (name.clone(), amount, 0.0)
        }
        (None, ProductRef::ItemId(id)) => {
            return Err(Error::ItemNotFound { id: id.clone() });
        }
    };
    validate_amount(amount)?;

    let sale = Sale {
        id: new_id("sale"),
        bar_id: bar.id.clone(),
        bar_name: bar.name.clone(),
        product_name,
        amount,
        quantity: draft.quantity,
        total: Sale::compute_total(amount, draft.quantity, tax_rate),
        date: Utc::now(),
        staff_name: draft.staff_name.trim().to_string(),
    };

    if let Some(index) = matched {
        let item = &mut items[index];
        if draft.quantity > item.quantity {
            warn!(
                "Sale of {} {} exceeds stock of {}, clamping at zero",
                draft.quantity, item.name, item.quantity
            );
        }
        item.quantity = item.quantity.saturating_sub(draft.quantity);
        save_collection(store, INVENTORY_KEY, &items).await?;
    }

    let mut sales = get_all_sales(store).await?;
    sales.insert(0, sale.clone());
    save_collection(store, SALES_KEY, &sales).await?;

    info!(
        "Sale added by {}: {} x {} at {} = {:.2}",
        actor.name, sale.quantity, sale.product_name, sale.bar_name, sale.total
    );
    Ok(sale)
}

/// Updates a sale, recomputing its total with a fresh tax lookup.
///
/// Inventory quantities are not adjusted for the change. If the bar changes,
/// the stored bar name is refreshed from the directory.
pub async fn edit_sale<S: KvStore>(
    store: &S,
    session: &Session,
    bars: &BarDirectory,
    updated: Sale,
) -> Result<Sale> {
    let actor = session.require_manager("edit sales")?;
    validate_common(&updated.bar_id, updated.quantity, &updated.staff_name)?;
    if updated.product_name.trim().is_empty() {
        return Err(Error::validation("productName", "Product name is required"));
    }
    validate_amount(updated.amount)?;
    let bar = bars.require(&updated.bar_id)?;

    let items: Vec<InventoryItem> = load_collection(store, INVENTORY_KEY).await?;
    let mut sales = get_all_sales(store).await?;
    let slot = sales
        .iter_mut()
        .find(|sale| sale.id == updated.id)
        .ok_or_else(|| Error::SaleNotFound {
            id: updated.id.clone(),
        })?;

    let tax_rate = tax_rate_for(&items, &updated.bar_id, &updated.product_name);
    let bar_name = if slot.bar_id == updated.bar_id {
        slot.bar_name.clone()
    } else {
        bar.name.clone()
    };
    let edited = Sale {
        total: Sale::compute_total(updated.amount, updated.quantity, tax_rate),
        bar_name,
        date: slot.date,
        ..updated
    };
    *slot = edited.clone();
    save_collection(store, SALES_KEY, &sales).await?;

    info!("Sale {} updated by {}", edited.id, actor.name);
    Ok(edited)
}

/// Removes a sale. Stock consumed by it is not restored.
pub async fn delete_sale<S: KvStore>(store: &S, session: &Session, id: &str) -> Result<Sale> {
    let actor = session.require_manager("delete sales")?;

    let mut sales = get_all_sales(store).await?;
    let index = sales
        .iter()
        .position(|sale| sale.id == id)
        .ok_or_else(|| Error::SaleNotFound { id: id.to_string() })?;
    let removed = sales.remove(index);
    save_collection(store, SALES_KEY, &sales).await?;

    info!("Sale {} deleted by {}", removed.id, actor.name);
    Ok(removed)
}

/// Clears every sale record.
pub async fn reset_sales<S: KvStore>(store: &S, session: &Session) -> Result<()> {
    let actor = session.require_manager("reset sales")?;
    clear_collection(store, SALES_KEY).await?;
    info!("All sales have been reset by {}", actor.name);
    Ok(())
}

/// Case-insensitive search over product and staff names, optionally limited to one bar.
#[must_use]
pub fn filter_sales(sales: &[Sale], search: &str, bar_id: Option<&str>) -> Vec<Sale> {
    let needle = search.to_lowercase();
    sales
        .iter()
        .filter(|sale| {
            needle.is_empty()
                || sale.product_name.to_lowercase().contains(&needle)
                || sale.staff_name.to_lowercase().contains(&needle)
        })
        .filter(|sale| bar_id.is_none_or(|bar| sale.bar_id == bar))
        .cloned()
        .collect()
}
